//! Integration tests for gomarket

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const PRODUCTS: &str = r#"[{"id":"1","title":"Cadeira Rivatti","image_url":"https://img.example/chair.png","price":400}]"#;

    /// Binary with config and state isolated under `dir`
    fn gomarket(dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("gomarket");
        cmd.env_remove("GOMARKET_CONFIG")
            .env_remove("GOMARKET_STATE_DIR")
            .arg("--config")
            .arg(dir.join("config.toml"))
            .arg("--state-dir")
            .arg(dir.join("state"));
        cmd
    }

    fn write_config(dir: &Path, base_url: &str) {
        std::fs::write(
            dir.join("config.toml"),
            format!("[catalog]\nbase_url = \"{}\"\ntimeout_secs = 5\n", base_url),
        )
        .unwrap();
    }

    /// Answer one HTTP request with the product list
    fn serve_catalog_once() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                PRODUCTS.len(),
                PRODUCTS
            );
            stream.write_all(response.as_bytes()).unwrap();
        });

        format!("http://{}", addr)
    }

    fn store_files(dir: &Path) -> Vec<PathBuf> {
        std::fs::read_dir(dir.join("state").join("store"))
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect()
    }

    fn cart_json(dir: &Path) -> serde_json::Value {
        let output = gomarket(dir)
            .args(["cart", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("marketplace storefront and cart"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gomarket"));
    }

    #[test]
    fn empty_cart() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .arg("cart")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cart is empty"));
    }

    #[test]
    fn empty_cart_json() {
        let temp = TempDir::new().unwrap();
        let json = cart_json(temp.path());
        assert_eq!(json["items"], serde_json::json!([]));
        assert_eq!(json["summary"]["item_count"], 0);
    }

    #[test]
    fn unknown_line_is_noop() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .args(["increment", "42"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cart line for 42"));

        // The no-op still wrote an empty cart
        let files = store_files(temp.path());
        assert_eq!(files.len(), 1);
        assert_eq!(std::fs::read_to_string(&files[0]).unwrap(), "[]");
    }

    #[test]
    fn add_increment_decrement_roundtrip() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), &serve_catalog_once());

        gomarket(temp.path())
            .args(["add", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Added Cadeira Rivatti to cart"));

        let json = cart_json(temp.path());
        assert_eq!(json["items"][0]["id"], "1");
        assert_eq!(json["items"][0]["quantity"], 1);

        gomarket(temp.path())
            .args(["increment", "1"])
            .assert()
            .success();
        assert_eq!(cart_json(temp.path())["items"][0]["quantity"], 2);

        gomarket(temp.path())
            .args(["decrement", "1"])
            .assert()
            .success();
        gomarket(temp.path())
            .args(["decrement", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Removed 1 from cart"));

        assert_eq!(cart_json(temp.path())["items"], serde_json::json!([]));

        let audit = std::fs::read_to_string(temp.path().join("state").join("audit.log")).unwrap();
        assert!(audit.contains("cart.item_added"));
        assert!(audit.contains("cart.decremented"));
    }

    #[test]
    fn corrupt_cart_fails() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path()).args(["increment", "x"]).assert().success();

        let files = store_files(temp.path());
        std::fs::write(&files[0], "[{\"id\":").unwrap();

        gomarket(temp.path())
            .arg("cart")
            .assert()
            .failure()
            .stderr(predicate::str::contains("is corrupt"));
    }

    #[test]
    fn catalog_unreachable() {
        let temp = TempDir::new().unwrap();
        // Nothing listens on the discard port
        write_config(temp.path(), "http://127.0.0.1:9");

        gomarket(temp.path())
            .args(["catalog", "--format", "json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Catalog request"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[store]"))
            .stdout(predicate::str::contains("@GoMarketplace:products"));
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        gomarket(temp.path())
            .args(["config", "set", "vm.name", "x"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }
}
