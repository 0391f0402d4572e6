use euclid_core::config::CONFIG_FILE_NAME;
use euclid_core::context::AppContext;
use euclid_core::orchestrator::SyncPhase;
use tempfile::TempDir;

#[test]
fn app_context_creates_from_paths() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("config");
    let cache_dir = temp.path().join("cache");

    let ctx = AppContext::new(config_dir.clone(), cache_dir.clone());

    assert_eq!(ctx.config_dir(), config_dir);
    assert_eq!(ctx.cache_dir(), cache_dir);
}

#[test]
fn app_context_store_uses_config_dir() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().join("config"), temp.path().join("cache"));

    let store = ctx.config_store();

    assert_eq!(
        store.config_path(),
        temp.path().join("config").join(CONFIG_FILE_NAME)
    );
}

#[test]
fn first_run_config_carries_detected_install_root() {
    let temp = TempDir::new().unwrap();
    let game = temp.path().join(".minecraft");
    let ctx = AppContext::new(temp.path().join("config"), temp.path().join("cache"))
        .with_detected_install_root(Some(game.clone()));

    let config = ctx.config_store().load().unwrap();

    assert_eq!(config.install_root, Some(game));
    assert!(ctx.config_store().config_path().exists());
}

#[test]
fn first_run_without_detection_leaves_install_root_unset() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().join("config"), temp.path().join("cache"));

    let config = ctx.config_store().load().unwrap();

    assert_eq!(config.install_root, None);
}

#[test]
fn app_context_builds_idle_orchestrator() {
    let temp = TempDir::new().unwrap();
    let ctx = AppContext::new(temp.path().join("config"), temp.path().join("cache"));

    let orchestrator = ctx.orchestrator().unwrap();

    assert_eq!(orchestrator.phase(), SyncPhase::Idle);
    assert_eq!(
        orchestrator.config_store().config_path(),
        ctx.config_store().config_path()
    );
}
