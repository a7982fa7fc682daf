//! Swagger export through the facade, driven by configuration.

use http::Method;
use miyabi::prelude::*;
use miyabi_core::fixtures;

fn config_for(output_path: &str) -> MiyabiConfig {
    let toml = format!(
        r#"
        [docs]
        host = "api.example.com"
        title = "User Service"
        version = "2.1.0"
        schemes = ["https"]
        base_path = "/v2"
        output_path = "{output_path}"
        "#
    );

    ConfigLoader::new()
        .with_string(&toml, "toml")
        .unwrap()
        .load()
        .unwrap()
}

fn app(config: &MiyabiConfig) -> MiyabiApp {
    let mut miyabi = Miyabi::from_config(config);
    miyabi
        .add_route("getUser", Method::GET, "/users/{id}", fixtures::get_user_view())
        .unwrap()
        .add_route("createUser", Method::POST, "/users", fixtures::create_user_view())
        .unwrap();
    miyabi.build()
}

#[test]
fn test_configured_swagger_written_as_yaml() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("swagger.yaml");
    let config = config_for(&output.display().to_string());

    app(&config).write_configured_swagger().unwrap();

    let yaml = std::fs::read_to_string(&output).unwrap();
    let document: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();

    assert_eq!(document["swagger"], "2.0");
    assert_eq!(document["host"], "api.example.com");
    assert_eq!(document["basePath"], "/v2");
    assert_eq!(document["info"]["title"], "User Service");

    let parameter = &document["paths"]["/users/{id}"]["get"]["parameters"][0];
    assert_eq!(parameter["name"], "id");
    assert_eq!(parameter["in"], "path");
    assert_eq!(parameter["type"], "integer");
    assert_eq!(parameter["required"], true);
}

#[test]
fn test_swagger_written_as_json_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("swagger.json");
    let config = config_for("swagger.yaml");
    let app = app(&config);

    app.write_swagger(app.basic_info(), &output).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["produces"][0], "application/json");
    assert_eq!(
        json["paths"]["/users"]["post"]["parameters"][0]["schema"]["$ref"],
        "#/definitions/CreateUserRequest"
    );
    assert_eq!(
        json["definitions"]["UserResponse"]["properties"]["email"]["type"],
        "string"
    );
}

#[test]
fn test_write_to_missing_directory_fails() {
    let config = config_for("swagger.yaml");
    let app = app(&config);

    let result = app.write_swagger(app.basic_info(), "/nonexistent/dir/swagger.yaml");
    assert!(matches!(result, Err(miyabi::docs::DocsError::IoError(_))));
}
