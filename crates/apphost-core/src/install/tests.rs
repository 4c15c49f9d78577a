//! Install coordinator tests against an in-memory DB and a scripted installer.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::app_db::{open_memory, AppRecord, NewApp};
use crate::domains::StaticDomains;
use crate::install::{AppManager, InstallError};
use crate::package::{
    AppSource, InstallContext, Manifest, Package, PackageError, PackageInstaller,
};
use crate::route_registry::RouteRegistry;
use crate::url_model::Route;

const MAIN: &str = "example.org";

#[derive(Default)]
struct FakeInstaller {
    multi_instance: bool,
    fail_install: AtomicBool,
    install_delay: Option<Duration>,
    installs: AtomicUsize,
    inspects: AtomicUsize,
    removed: Mutex<Vec<String>>,
}

impl FakeInstaller {
    fn slow(delay: Duration) -> Self {
        Self {
            install_delay: Some(delay),
            ..Self::default()
        }
    }
}

impl PackageInstaller for FakeInstaller {
    async fn inspect(&self, source: &AppSource) -> Result<Package, PackageError> {
        self.inspects.fetch_add(1, Ordering::SeqCst);
        if source.local_dir().is_none() {
            return Err(PackageError::UnsupportedSource {
                location: source.to_string(),
            });
        }
        Ok(Package {
            manifest: Manifest {
                id: "register_url_app".to_string(),
                name: Some("Register URL app".to_string()),
                version: Some("1.0".to_string()),
                multi_instance: self.multi_instance,
            },
            manifest_sha256: None,
        })
    }

    async fn install(&self, _ctx: &InstallContext) -> Result<(), PackageError> {
        self.installs.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.install_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_install.load(Ordering::SeqCst) {
            return Err(PackageError::ScriptFailed {
                script: "scripts/install".to_string(),
                code: Some(1),
                stderr: "boom".to_string(),
            });
        }
        Ok(())
    }

    async fn remove(&self, app: &AppRecord) -> Result<(), PackageError> {
        self.removed.lock().unwrap().push(app.id.clone());
        Ok(())
    }
}

async fn manager(installer: FakeInstaller) -> AppManager<FakeInstaller> {
    let dir = StaticDomains::new(Some(MAIN), ["wiki.example.org"]);
    let registry = Arc::new(RouteRegistry::new(Arc::new(dir)));
    let db = open_memory().await.unwrap();
    AppManager::new(registry, db, installer)
}

/// Let spawned rollback tasks run.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}

fn source() -> AppSource {
    AppSource::parse("./tests/apps/register_url_app_ynh")
}

async fn install_at(
    mgr: &AppManager<FakeInstaller>,
    domain: &str,
    path: &str,
) -> Result<AppRecord, InstallError> {
    mgr.app_install(&source(), domain, path, BTreeMap::new())
        .await
}

#[tokio::test]
async fn url_available_on_main_domain() {
    let mgr = manager(FakeInstaller::default()).await;
    assert!(mgr.url_available(MAIN, "/macnuggets").unwrap().available);
}

#[tokio::test]
async fn url_available_unknown_domain_is_error() {
    let mgr = manager(FakeInstaller::default()).await;
    let err = mgr.url_available("yolo.swag", "/macnuggets").unwrap_err();
    assert!(matches!(err, InstallError::UnknownDomain { ref domain } if domain == "yolo.swag"));
}

#[tokio::test]
async fn installed_route_becomes_unavailable() {
    let mgr = manager(FakeInstaller::default()).await;
    let rec = install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap();
    assert_eq!(rec.id, "register_url_app");
    assert_eq!(rec.route, Route::normalized(MAIN, "/urlregisterapp"));

    let avail = mgr.url_available(MAIN, "/urlregisterapp").unwrap();
    assert!(!avail.available);
    assert_eq!(avail.owner.as_deref(), Some("register_url_app"));
    // Equivalent spelling of the same route.
    assert!(!mgr
        .url_available("https://example.org/", "urlregisterapp/")
        .unwrap()
        .available);
}

#[tokio::test]
async fn second_install_at_same_route_always_fails() {
    let mgr = manager(FakeInstaller {
        multi_instance: true,
        ..FakeInstaller::default()
    })
    .await;
    install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap();

    for _ in 0..3 {
        let err = install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap_err();
        match err {
            InstallError::RouteTaken { owner, route } => {
                assert_eq!(owner, "register_url_app");
                assert_eq!(route.path, "/urlregisterapp");
            }
            other => panic!("expected RouteTaken, got {other:?}"),
        }
    }
    assert_eq!(mgr.installer_calls(), 1);
    assert_eq!(mgr.list_apps().await.unwrap().len(), 1);
}

#[tokio::test]
async fn non_multi_instance_app_route_conflict_still_reports_route_taken() {
    let mgr = manager(FakeInstaller::default()).await;
    install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap();
    let err = install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap_err();
    assert!(matches!(err, InstallError::RouteTaken { .. }));
}

#[tokio::test]
async fn install_on_unknown_domain_reserves_nothing() {
    let mgr = manager(FakeInstaller::default()).await;
    let err = install_at(&mgr, "yolo.swag", "/urlregisterapp")
        .await
        .unwrap_err();
    assert!(matches!(err, InstallError::UnknownDomain { .. }));
    assert!(mgr.registry().is_empty());
    assert!(mgr.list_apps().await.unwrap().is_empty());
    assert_eq!(mgr.installer().inspects.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_package_install_releases_route() {
    let installer = FakeInstaller::default();
    installer.fail_install.store(true, Ordering::SeqCst);
    let mgr = manager(installer).await;

    let err = install_at(&mgr, MAIN, "/broken").await.unwrap_err();
    assert!(matches!(err, InstallError::PackageInstall { ref app, .. } if app == "register_url_app"));
    assert!(mgr.url_available(MAIN, "/broken").unwrap().available);
    assert!(mgr.list_apps().await.unwrap().is_empty());

    // The same route can be claimed once the package behaves.
    mgr.installer().fail_install.store(false, Ordering::SeqCst);
    install_at(&mgr, MAIN, "/broken").await.unwrap();
}

#[tokio::test]
async fn timed_out_install_releases_route() {
    let mgr = manager(FakeInstaller::slow(Duration::from_secs(30)))
        .await
        .with_install_timeout(Duration::from_millis(50));
    let err = install_at(&mgr, MAIN, "/slow").await.unwrap_err();
    assert!(matches!(err, InstallError::InstallTimedOut { .. }));
    assert!(mgr.url_available(MAIN, "/slow").unwrap().available);
    assert_eq!(
        *mgr.installer().removed.lock().unwrap(),
        vec!["register_url_app".to_string()]
    );
    assert!(mgr.list_apps().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_package_install_is_not_rolled_back_again() {
    let installer = FakeInstaller::default();
    installer.fail_install.store(true, Ordering::SeqCst);
    let mgr = manager(installer).await;
    install_at(&mgr, MAIN, "/broken").await.unwrap_err();
    assert!(mgr.installer().removed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn cancelled_install_releases_route() {
    let mgr = manager(FakeInstaller::slow(Duration::from_secs(30))).await;
    tokio::select! {
        _ = install_at(&mgr, MAIN, "/cancelled") => panic!("install should not finish"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => {}
    }
    // Rollback runs in a background task; the route is released after it.
    settle().await;
    assert!(mgr.url_available(MAIN, "/cancelled").unwrap().available);
    assert!(mgr.registry().is_empty());
    assert_eq!(
        *mgr.installer().removed.lock().unwrap(),
        vec!["register_url_app".to_string()]
    );
}

#[tokio::test]
async fn cancelled_install_holds_route_until_rolled_back() {
    let mgr = manager(FakeInstaller::slow(Duration::from_secs(30))).await;
    tokio::select! {
        _ = install_at(&mgr, MAIN, "/held") => panic!("install should not finish"),
        _ = tokio::time::sleep(Duration::from_millis(50)) => {}
    }
    // Nothing has yielded to the rollback task yet.
    assert_eq!(
        mgr.registry().owner(&Route::normalized(MAIN, "/held")).as_deref(),
        Some("register_url_app")
    );
    settle().await;
    assert!(mgr.registry().is_empty());
}

#[tokio::test]
async fn route_stays_reserved_during_install() {
    let mgr = manager(FakeInstaller::slow(Duration::from_millis(200))).await;
    let install = install_at(&mgr, MAIN, "/busy");
    let check = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let during = mgr.url_available(MAIN, "/busy").unwrap();
        let other = mgr.url_available(MAIN, "/elsewhere").unwrap();
        (during, other)
    };
    let (installed, (during, other)) = tokio::join!(install, check);
    installed.unwrap();
    assert!(!during.available);
    assert!(other.available);
}

#[tokio::test]
async fn concurrent_installs_of_same_route_have_one_winner() {
    let mgr = manager(FakeInstaller {
        multi_instance: true,
        install_delay: Some(Duration::from_millis(20)),
        ..FakeInstaller::default()
    })
    .await;
    let (a, b, c) = tokio::join!(
        install_at(&mgr, MAIN, "/race"),
        install_at(&mgr, MAIN, "/race"),
        install_at(&mgr, MAIN, "/race"),
    );
    let results = [a, b, c];
    let ok = results.iter().filter(|r| r.is_ok()).count();
    let taken = results
        .iter()
        .filter(|r| matches!(r, Err(InstallError::RouteTaken { .. })))
        .count();
    assert_eq!(ok, 1);
    assert_eq!(taken, 2);
    assert_eq!(mgr.installer_calls(), 1);
}

#[tokio::test]
async fn install_remove_reinstall_round_trip() {
    let mgr = manager(FakeInstaller::default()).await;
    install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap();
    mgr.app_remove("register_url_app").await.unwrap();
    assert!(mgr.url_available(MAIN, "/urlregisterapp").unwrap().available);
    assert_eq!(
        *mgr.installer().removed.lock().unwrap(),
        vec!["register_url_app".to_string()]
    );
    let rec = install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap();
    assert_eq!(rec.id, "register_url_app");
}

#[tokio::test]
async fn strict_remove_of_missing_app_fails_best_effort_does_not() {
    let mgr = manager(FakeInstaller::default()).await;
    let err = mgr.app_remove("register_url_app").await.unwrap_err();
    assert!(matches!(err, InstallError::AppNotFound { .. }));
    assert!(!mgr.app_remove_best_effort("register_url_app").await);
    assert!(!mgr.app_remove_best_effort("register_url_app").await);
    assert!(mgr.installer().removed.lock().unwrap().is_empty());

    install_at(&mgr, MAIN, "/urlregisterapp").await.unwrap();
    assert!(mgr.app_remove_best_effort("register_url_app").await);
}

#[tokio::test]
async fn multi_instance_apps_get_numbered_ids() {
    let mgr = manager(FakeInstaller {
        multi_instance: true,
        ..FakeInstaller::default()
    })
    .await;
    let a = install_at(&mgr, MAIN, "/one").await.unwrap();
    let b = install_at(&mgr, "wiki.example.org", "/").await.unwrap();
    assert_eq!(a.id, "register_url_app");
    assert_eq!(b.id, "register_url_app__2");
    assert_eq!(b.manifest_id, "register_url_app");
}

#[tokio::test]
async fn single_instance_app_cannot_install_twice() {
    let mgr = manager(FakeInstaller::default()).await;
    install_at(&mgr, MAIN, "/one").await.unwrap();
    let err = install_at(&mgr, MAIN, "/two").await.unwrap_err();
    assert!(matches!(err, InstallError::AlreadyInstalled { .. }));
    assert!(mgr.url_available(MAIN, "/two").unwrap().available);
}

#[tokio::test]
async fn remote_source_rejected_before_reservation() {
    let mgr = manager(FakeInstaller::default()).await;
    let err = mgr
        .app_install(
            &AppSource::parse("https://example.org/app_ynh"),
            MAIN,
            "/remote",
            BTreeMap::new(),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        InstallError::Package(PackageError::UnsupportedSource { .. })
    ));
    assert!(mgr.registry().is_empty());
}

#[tokio::test]
async fn load_seeds_registry_from_database() {
    let db = open_memory().await.unwrap();
    db.add_app(&NewApp {
        id: "wiki".to_string(),
        manifest_id: "wiki".to_string(),
        label: None,
        version: None,
        source: "/srv/wiki_ynh".to_string(),
        route: Route::normalized(MAIN, "/wiki"),
        args: BTreeMap::new(),
        manifest_sha256: None,
    })
    .await
    .unwrap();

    let dir = Arc::new(StaticDomains::new(Some(MAIN), Vec::<String>::new()));
    let mgr = AppManager::load(dir, db, FakeInstaller::default())
        .await
        .unwrap();
    let avail = mgr.url_available(MAIN, "wiki").unwrap();
    assert_eq!(avail.owner.as_deref(), Some("wiki"));
    mgr.app_remove("wiki").await.unwrap();
    assert!(mgr.url_available(MAIN, "wiki").unwrap().available);
}

impl AppManager<FakeInstaller> {
    fn installer_calls(&self) -> usize {
        self.installer().installs.load(Ordering::SeqCst)
    }
}
