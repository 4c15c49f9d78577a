pub mod package_dir;
