//! Generation through the library against installed templates.

use ironman::Ironman;
use ironman::core::{ErrorKind, error_kind};
use ironman::model::Values;
use ironman::test_utils::{GeneratorFixture, TemplateFixture};
use serde_json::json;

use crate::common::{FileAssert, TestHome};

fn values(pairs: &[(&str, serde_json::Value)]) -> Values {
    pairs.iter().map(|(key, value)| ((*key).to_string(), value.clone())).collect()
}

async fn installed(env: &TestHome, fixture: TemplateFixture) -> Ironman {
    let source = env.create_template_repo(&fixture).unwrap();
    let ironman = Ironman::new(env.home()).unwrap();
    ironman.ensure_home().unwrap();
    ironman.install(&source.display().to_string()).await.unwrap();
    ironman
}

fn service_template() -> TemplateFixture {
    TemplateFixture::new("service").without_generators().with_generator(
        GeneratorFixture::directory("app")
            .with_file("README.md", "# {{ values.name }}\n\n{{ template.name }} / {{ generator.id }}\n")
            .with_file("src/{{ values.name }}.rs", "pub const PORT: u16 = {{ values.port }};\n")
            .with_file("config/{% if values.debug %}debug{% else %}release{% endif %}.toml", "level = 1\n"),
    )
}

#[tokio::test]
async fn test_directory_generator_renders_content_and_paths() {
    let env = TestHome::new().unwrap();
    let ironman = installed(&env, service_template()).await;
    let out = env.work_path().join("billing");

    let report = ironman
        .generate("service", "app", &out, &values(&[("name", json!("billing")), ("port", json!(8080)), ("debug", json!(false))]), false)
        .await
        .unwrap();

    assert_eq!(report.files.len(), 3);
    FileAssert::equals(out.join("README.md"), "# billing\n\nservice template / app\n");
    FileAssert::equals(out.join("src/billing.rs"), "pub const PORT: u16 = 8080;\n");
    FileAssert::exists(out.join("config/release.toml"));
    FileAssert::not_exists(out.join(".ironman.yaml"));
}

#[tokio::test]
async fn test_non_empty_target_requires_force() {
    let env = TestHome::new().unwrap();
    let ironman = installed(&env, TemplateFixture::new("base")).await;
    let out = env.work_path().join("out");
    std::fs::create_dir_all(&out).unwrap();
    std::fs::write(out.join("existing.txt"), "keep").unwrap();

    let err = ironman.generate("base", "app", &out, &values(&[("name", json!("a"))]), false).await.unwrap_err();
    assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));
    FileAssert::not_exists(out.join("README.md"));

    ironman.generate("base", "app", &out, &values(&[("name", json!("a"))]), true).await.unwrap();
    FileAssert::equals(out.join("README.md"), "# a\n");
    FileAssert::equals(out.join("existing.txt"), "keep");

    ironman.generate("base", "app", &out, &values(&[("name", json!("b"))]), true).await.unwrap();
    FileAssert::equals(out.join("README.md"), "# b\n");
    assert_eq!(std::fs::read_dir(&out).unwrap().count(), 2);
}

#[tokio::test]
async fn test_file_generator() {
    let env = TestHome::new().unwrap();
    let fixture = TemplateFixture::new("base").with_generator(
        GeneratorFixture::file("model", "models").with_file("model.rs", "pub struct {{ values.name }};\n"),
    );
    let ironman = installed(&env, fixture).await;
    std::fs::create_dir_all(env.work_path().join("models")).unwrap();

    let target = env.work_path().join("user.rs");
    ironman.generate("base", "model", &target, &values(&[("name", json!("User"))]), false).await.unwrap();
    FileAssert::equals(env.work_path().join("models/user.rs"), "pub struct User;\n");

    let err = ironman.generate("base", "model", &target, &values(&[("name", json!("User"))]), false).await.unwrap_err();
    assert_eq!(error_kind(&err), Some(ErrorKind::Conflict));
}

#[tokio::test]
async fn test_file_generator_into_missing_parent() {
    let env = TestHome::new().unwrap();
    let fixture = TemplateFixture::new("base")
        .with_generator(GeneratorFixture::file("model", "").with_file("model.rs", "x\n"));
    let ironman = installed(&env, fixture).await;
    let target = env.work_path().join("missing/user.rs");

    let err = ironman.generate("base", "model", &target, &Values::new(), false).await.unwrap_err();

    assert_eq!(error_kind(&err), Some(ErrorKind::InvalidTarget));
    FileAssert::not_exists(env.work_path().join("missing"));
}

#[tokio::test]
async fn test_missing_value_names_the_file() {
    let env = TestHome::new().unwrap();
    let ironman = installed(&env, TemplateFixture::new("base")).await;

    let err = ironman.generate("base", "app", &env.work_path().join("out"), &Values::new(), false).await.unwrap_err();

    assert_eq!(error_kind(&err), Some(ErrorKind::RenderFailed));
    assert!(format!("{err:#}").contains("README.md"));
}
