//! The `ironman` binary end to end.

use ironman::test_utils::TemplateFixture;
use predicates::prelude::*;

use crate::common::{FileAssert, TestHome};

#[test]
fn test_install_generate_uninstall() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base")).unwrap();

    env.ironman()
        .arg("install")
        .arg(&source)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed template 'base'"));

    env.ironman()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("base [installed]").and(predicate::str::contains("app (directory)")));

    env.ironman()
        .args(["generate", "base:app", "out", "--set", "name=demo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 file(s)"));
    FileAssert::equals(env.work_path().join("out/README.md"), "# demo\n");

    env.ironman().args(["uninstall", "base"]).assert().success();
    env.ironman()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates installed"));
}

#[test]
fn test_list_json() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base").version("0.1.0")).unwrap();
    env.ironman().arg("install").arg(&source).assert().success();

    let output = env.ironman().args(["list", "--json"]).output().unwrap();
    assert!(output.status.success());
    let templates: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(templates[0]["id"], "base");
    assert_eq!(templates[0]["version"], "0.1.0");
    assert_eq!(templates[0]["source_type"], "url");
}

#[test]
fn test_generate_with_values_file() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base")).unwrap();
    env.ironman().arg("install").arg(&source).assert().success();
    std::fs::write(env.work_path().join("values.yaml"), "name: from-file\n").unwrap();

    env.ironman()
        .args(["generate", "base:app", "a", "--values", "values.yaml"])
        .assert()
        .success();
    FileAssert::equals(env.work_path().join("a/README.md"), "# from-file\n");

    env.ironman()
        .args(["generate", "base:app", "b", "--values", "values.yaml", "--set", "name=override"])
        .assert()
        .success();
    FileAssert::equals(env.work_path().join("b/README.md"), "# override\n");
}

#[test]
fn test_generate_into_non_empty_directory() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base")).unwrap();
    env.ironman().arg("install").arg(&source).assert().success();
    std::fs::create_dir_all(env.work_path().join("out")).unwrap();
    std::fs::write(env.work_path().join("out/keep.txt"), "x").unwrap();

    env.ironman()
        .args(["generate", "base:app", "out", "--set", "name=demo"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not empty"));

    env.ironman()
        .args(["generate", "base:app", "out", "--set", "name=demo", "--force"])
        .assert()
        .success();
    FileAssert::equals(env.work_path().join("out/README.md"), "# demo\n");
}

#[test]
fn test_unknown_generator_suggests_closest() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base")).unwrap();
    env.ironman().arg("install").arg(&source).assert().success();

    env.ironman()
        .args(["generate", "base:ap", "out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Generator 'ap' does not exist").and(predicate::str::contains("'app'")));
}

#[test]
fn test_uninstall_unknown_template() {
    let env = TestHome::new().unwrap();

    env.ironman()
        .args(["uninstall", "ghost"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Template 'ghost' is not installed"));
}

#[test]
fn test_malformed_arguments_are_rejected_by_the_parser() {
    let env = TestHome::new().unwrap();

    env.ironman().args(["generate", "base", "out"]).assert().failure().code(2);
    env.ironman().args(["generate", "base:app", "out", "--set", "name"]).assert().failure().code(2);
}

#[test]
fn test_create_then_link() {
    let env = TestHome::new().unwrap();

    env.ironman()
        .args(["create", "starter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created template 'starter'"));
    FileAssert::exists(env.work_path().join("starter/.ironman.yaml"));
    FileAssert::exists(env.work_path().join("starter/generators/app/README.md"));

    if cfg!(unix) {
        env.ironman().args(["link", "starter", "starter"]).assert().success();
        env.ironman()
            .args(["generate", "starter:app", "out", "--set", "name=hello"])
            .assert()
            .success();
        FileAssert::equals(env.work_path().join("out/README.md"), "# hello\n\nGenerated from starter:app.\n");
        env.ironman().args(["unlink", "starter"]).assert().success();
        FileAssert::exists(env.work_path().join("starter/.ironman.yaml"));
    }
}

#[test]
fn test_quiet_prints_nothing_on_success() {
    let env = TestHome::new().unwrap();
    let source = env.create_template_repo(&TemplateFixture::new("base")).unwrap();

    env.ironman().arg("--quiet").arg("install").arg(&source).assert().success().stdout(predicate::str::is_empty());
}
