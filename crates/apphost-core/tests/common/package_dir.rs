//! Builds throwaway script packages on disk.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A package directory (`manifest.json`, `scripts/install`, `scripts/remove`)
/// plus an output directory the scripts write marker files into.
pub struct TestPackage {
    pub dir: TempDir,
    pub out: TempDir,
}

impl TestPackage {
    /// Install writes `<out>/<APP_ID>` with `domain path admin-arg`; remove deletes it.
    pub fn new(id: &str, multi_instance: bool) -> Self {
        let pkg = Self {
            dir: tempfile::tempdir().unwrap(),
            out: tempfile::tempdir().unwrap(),
        };
        let manifest = serde_json::json!({
            "id": id,
            "name": format!("{id} app"),
            "version": "1.0",
            "multi_instance": multi_instance,
        });
        fs::write(pkg.dir.path().join("manifest.json"), manifest.to_string()).unwrap();
        let out = pkg.out.path().display().to_string();
        pkg.write_script(
            "install",
            &format!(
                "#!/bin/sh\nset -e\necho \"$APP_DOMAIN $APP_PATH $APP_ARG_ADMIN\" > \"{out}/$APP_ID\"\n"
            ),
        );
        pkg.write_script("remove", &format!("#!/bin/sh\nrm -f \"{out}/$APP_ID\"\n"));
        pkg
    }

    pub fn write_script(&self, name: &str, body: &str) {
        let scripts = self.dir.path().join("scripts");
        fs::create_dir_all(&scripts).unwrap();
        let path = scripts.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn marker(&self, app_id: &str) -> PathBuf {
        self.out.path().join(app_id)
    }
}
