//! Install, update, uninstall, link and unlink against a real home.

use ironman::Ironman;
use ironman::core::{ErrorKind, error_kind};
use ironman::model::SourceType;
use ironman::test_utils::{GeneratorFixture, TemplateFixture, TestGit, init_test_logging};

use crate::common::{FileAssert, TestHome};

fn open(env: &TestHome) -> Ironman {
    init_test_logging(None);
    let ironman = Ironman::new(env.home()).unwrap();
    ironman.ensure_home().unwrap();
    ironman
}

#[tokio::test]
async fn test_install_list_uninstall() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base").version("1.2.0")).unwrap();
    let ironman = open(&env);

    let template = ironman.install(&source.display().to_string()).await.unwrap();
    assert_eq!(template.id, "base");
    assert_eq!(template.version.as_deref(), Some("1.2.0"));
    assert_eq!(template.source_type, SourceType::Url);
    FileAssert::exists(env.home().join("templates/base/generators/app/README.md"));
    FileAssert::exists(env.home().join("templates.index"));

    // The index survives a new orchestrator
    let reopened = open(&env);
    assert_eq!(reopened.list().unwrap(), vec![template]);

    reopened.uninstall("base").unwrap();
    assert!(reopened.list().unwrap().is_empty());
    FileAssert::not_exists(env.home().join("templates/base"));
    FileAssert::exists(source.join(".ironman.yaml"));
}

#[tokio::test]
async fn test_update_pulls_new_generators() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base")).unwrap();
    let ironman = open(&env);
    ironman.install(&source.display().to_string()).await.unwrap();

    GeneratorFixture::file("model", "models")
        .with_file("model.rs", "pub struct {{ values.name }};\n")
        .write_to(&source.join("generators"))
        .unwrap();
    let git = TestGit::new(&source);
    git.add_all().unwrap();
    git.commit("Add model generator").unwrap();

    ironman.update("base").await.unwrap();
    FileAssert::exists(env.home().join("templates/base/generators/model/model.rs"));

    let err = ironman.update("missing").await.unwrap_err();
    assert_eq!(error_kind(&err), Some(ErrorKind::NotFound));
}

#[tokio::test]
async fn test_invalid_template_leaves_no_trace() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("broken").version("one")).unwrap();
    let ironman = open(&env);

    let err = ironman.install(&source.display().to_string()).await.unwrap_err();

    assert_eq!(error_kind(&err), Some(ErrorKind::ValidationFailed));
    assert!(ironman.list().unwrap().is_empty());
    FileAssert::not_exists(env.home().join("templates/broken"));
}

#[tokio::test]
async fn test_install_from_unreachable_locator() {
    let env = TestHome::new().unwrap();
    let ironman = open(&env);
    let missing = env.sources_path().join("nowhere");

    let err = ironman.install(&missing.display().to_string()).await.unwrap_err();

    assert_eq!(error_kind(&err), Some(ErrorKind::FetchFailed));
    FileAssert::not_exists(env.home().join("templates/nowhere"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_link_then_unlink_keeps_source() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_folder(&TemplateFixture::new("local")).unwrap();
    let ironman = open(&env);

    let template = ironman.link(&source, "mine").unwrap();
    assert_eq!(template.id, "mine");
    assert_eq!(template.source_type, SourceType::Link);
    assert!(env.home().join("templates/mine").symlink_metadata().unwrap().file_type().is_symlink());

    ironman.unlink("mine").unwrap();
    assert!(ironman.list().unwrap().is_empty());
    FileAssert::not_exists(env.home().join("templates/mine"));
    FileAssert::exists(source.join("generators/app/README.md"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_uninstall_of_linked_template_keeps_source() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_folder(&TemplateFixture::new("local")).unwrap();
    let ironman = open(&env);
    ironman.link(&source, "mine").unwrap();

    ironman.uninstall("mine").unwrap();

    FileAssert::not_exists(env.home().join("templates/mine"));
    FileAssert::exists(source.join(".ironman.yaml"));
}
