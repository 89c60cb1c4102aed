//! Integration tests for YAML parsing

mod common;

use dosh::config::{find_config_file_from, parse_config, parse_config_file, validate_config};
use dosh::error::ConfigError;
use dosh::DoshError;

#[test]
fn test_parse_complete_config() {
    let yaml = r#"
environments:
  - DEV
  - PROD
  - TEST
aliases:
  docker: docker-compose -f docker-compose.yml -f docker-compose.${ENV}.yml
commands:
  start:
    help_text: Create and start containers
    run: RUN ${docker} up -d ${ARGS}
  shell:
    run: RUN ${docker} run --rm backend-shell bash
  initdb:
    environments:
      - DEV
    help_text: Load fixtures for development environment
    run:
      - MKDIR fixtures
      - RUN ${docker} run --rm backend-shell python manage.py initdb
"#;

    let config = parse_config(yaml).unwrap();
    validate_config(&config).unwrap();

    assert_eq!(config.sorted_environments(), vec!["DEV", "PROD", "TEST"]);
    assert_eq!(config.commands.len(), 3);

    let start = config.command("start").unwrap();
    assert_eq!(start.help_text, "Create and start containers");
    assert_eq!(start.run, vec!["RUN ${docker} up -d ${ARGS}"]);
    assert!(start.environments.is_empty());

    let shell = config.command("shell").unwrap();
    assert!(shell.help_text.is_empty());

    let initdb = config.command("initdb").unwrap();
    assert_eq!(initdb.run.len(), 2);
    assert!(initdb.environments.contains("DEV"));

    assert!(config.alias("docker").unwrap().contains("${ENV}"));
}

#[test]
fn test_parse_file_from_subdir() {
    let (_temp_dir, config_path, sub_dir) = common::create_test_config_in_subdir(
        r#"
commands:
  hello:
    run: PRINT hello
"#,
    );

    let found = find_config_file_from(sub_dir).unwrap();
    assert_eq!(found, config_path);

    let config = parse_config_file(&found).unwrap();
    assert!(config.command("hello").is_ok());
}

#[test]
fn test_unknown_command_lookup() {
    let (_temp_dir, config_path) = common::create_test_config(
        r#"
commands:
  hello:
    run: PRINT hello
"#,
    );

    let config = parse_config_file(&config_path).unwrap();
    assert!(matches!(
        config.command("goodbye"),
        Err(ConfigError::CommandNotFound(name)) if name == "goodbye"
    ));
}

#[test]
fn test_wrong_run_shape_is_rejected() {
    let yaml = r#"
commands:
  broken:
    run: 42
"#;
    assert!(parse_config(yaml).is_err());
}

#[test]
fn test_validation_rejects_undeclared_environment() {
    let yaml = r#"
environments: [DEV]
commands:
  deploy:
    environments: [PROD]
    run: RUN ./deploy.sh
"#;
    let config = parse_config(yaml).unwrap();
    assert!(matches!(
        validate_config(&config),
        Err(ConfigError::UndeclaredEnvironment { .. })
    ));
}

#[test]
fn test_duplicate_names_rejected() {
    let duplicate_command = r#"
commands:
  deploy:
    run: PRINT first
  deploy:
    run: PRINT second
"#;
    let err = parse_config(duplicate_command).unwrap_err();
    assert!(matches!(err, DoshError::Yaml(_)));
    assert!(err.to_string().contains("duplicate entry with key \"deploy\""));

    let duplicate_alias = r#"
aliases:
  x: one
  x: two
"#;
    let err = parse_config(duplicate_alias).unwrap_err();
    assert!(matches!(err, DoshError::Yaml(_)));
    assert!(err.to_string().contains("duplicate entry with key \"x\""));
}
