//! `apphost domains` – list the domains this host serves.

use apphost_core::domains::DomainDirectory;

pub fn run_domains(directory: &dyn DomainDirectory) {
    let main = directory.main_domain();
    for domain in directory.domains() {
        if Some(domain.as_str()) == main {
            println!("{domain} (main)");
        } else {
            println!("{domain}");
        }
    }
}
