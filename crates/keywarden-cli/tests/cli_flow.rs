use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

const MASTER_KEY: &str = "test-master-key-secure-123";

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_keywarden"))
}

struct TestEnv {
    _root: TempDir,
    home: PathBuf,
    vault_path: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        let home = root.path().join("home");
        std::fs::create_dir_all(&home).expect("create home dir");
        let vault_path = root.path().join("keywarden.vault");
        Self {
            _root: root,
            home,
            vault_path,
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.env_clear()
            .env("PATH", std::env::var_os("PATH").unwrap_or_default())
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env("XDG_DATA_HOME", self.home.join(".local/share"))
            .env("KEYWARDEN_VAULT", &self.vault_path)
            .env("KEYWARDEN_MASTER_KEY", MASTER_KEY);
        cmd
    }

    fn init(&self) {
        let output = self.command().arg("init").output().expect("run init");
        assert!(
            output.status.success(),
            "init failed: stdout={}, stderr={}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn add(&self, website: &str, password: &str) {
        let output = self
            .command()
            .arg("add")
            .arg(website)
            .arg("--password")
            .arg(password)
            .output()
            .expect("run add");
        assert!(
            output.status.success(),
            "add failed: stderr={}",
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn write_wordlist(dir: &Path) -> PathBuf {
    let path = dir.join("words.txt");
    let words = [
        "a", "i", "an", "at", "be", "ant", "cat", "dog", "bird", "door", "gate", "apple",
        "haven", "copper", "lantern",
    ];
    std::fs::write(&path, words.join("\n")).expect("write wordlist");
    path
}

#[test]
fn test_cli_init_add_get_list() {
    let env = TestEnv::new();
    env.init();
    assert!(env.vault_path.exists());

    env.add("example.com", "p@ss-w0rd");

    let get = env
        .command()
        .arg("get")
        .arg("example.com")
        .output()
        .expect("run get");
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "p@ss-w0rd");

    let list = env.command().arg("list").output().expect("run list");
    assert!(list.status.success());
    assert!(String::from_utf8_lossy(&list.stdout).contains("example.com"));
}

#[test]
fn test_cli_init_writes_config() {
    let env = TestEnv::new();
    env.init();

    let config_path = env.home.join(".config/keywarden/config.toml");
    assert!(config_path.exists(), "config file should exist");
    let contents = std::fs::read_to_string(&config_path).expect("read config");
    assert!(contents.contains("[vault]"));
    assert!(contents.contains("keywarden.vault"));
}

#[test]
fn test_cli_init_twice_fails() {
    let env = TestEnv::new();
    env.init();

    let again = env.command().arg("init").output().expect("run init");
    assert!(!again.status.success());
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(stderr.contains("already exists"));
}

#[test]
fn test_cli_list_json() {
    let env = TestEnv::new();
    env.init();
    env.add("beta.org", "b-pass");
    env.add("alpha.net", "a-pass");

    let list = env
        .command()
        .arg("list")
        .arg("--json")
        .output()
        .expect("run list");
    assert!(list.status.success());

    let value: serde_json::Value = serde_json::from_slice(&list.stdout).expect("parse list json");
    let array = value.as_array().expect("list output array");
    assert_eq!(array.len(), 2);
    let websites: Vec<&str> = array
        .iter()
        .map(|item| item.get("website").and_then(|v| v.as_str()).unwrap())
        .collect();
    assert!(websites.contains(&"alpha.net"));
    assert!(websites.contains(&"beta.org"));
    // Plaintext passwords never appear in the listing.
    let raw = String::from_utf8_lossy(&list.stdout);
    assert!(!raw.contains("a-pass"));
    assert!(!raw.contains("b-pass"));
}

#[test]
fn test_cli_list_empty_message() {
    let env = TestEnv::new();
    env.init();

    let list = env.command().arg("list").output().expect("run list");
    assert!(list.status.success());
    assert!(String::from_utf8_lossy(&list.stdout).contains("No passwords in the vault."));
}

#[test]
fn test_cli_duplicate_add_exit_code() {
    let env = TestEnv::new();
    env.init();
    env.add("Example.com", "p@ss");

    let again = env
        .command()
        .arg("add")
        .arg("example.com")
        .arg("--password")
        .arg("other")
        .output()
        .expect("run add");
    assert_eq!(again.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&again.stderr);
    assert!(stderr.contains("already exists"));

    // The original password survives.
    let get = env
        .command()
        .arg("get")
        .arg("example.com")
        .output()
        .expect("run get");
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "p@ss");
}

#[test]
fn test_cli_get_unknown_exit_code() {
    let env = TestEnv::new();
    env.init();

    let get = env
        .command()
        .arg("get")
        .arg("unknown.com")
        .output()
        .expect("run get");
    assert_eq!(get.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&get.stderr);
    assert!(stderr.contains("Can't seem to find a password for unknown.com"));
    assert!(stderr.contains("Hint:"));
}

#[test]
fn test_cli_update_changes_password() {
    let env = TestEnv::new();
    env.init();
    env.add("example.com", "old-pass");

    let update = env
        .command()
        .arg("update")
        .arg("example.com")
        .arg("--password")
        .arg("new-pass")
        .output()
        .expect("run update");
    assert!(update.status.success());

    let get = env
        .command()
        .arg("get")
        .arg("example.com")
        .output()
        .expect("run get");
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "new-pass");
}

#[test]
fn test_cli_delete_with_yes() {
    let env = TestEnv::new();
    env.init();
    env.add("example.com", "p@ss");

    let delete = env
        .command()
        .arg("delete")
        .arg("example.com")
        .arg("--yes")
        .output()
        .expect("run delete");
    assert!(delete.status.success());
    assert!(String::from_utf8_lossy(&delete.stdout).contains("Password destroyed."));

    let get = env
        .command()
        .arg("get")
        .arg("example.com")
        .output()
        .expect("run get");
    assert_eq!(get.status.code(), Some(3));
}

#[test]
fn test_cli_delete_unknown_exit_code() {
    let env = TestEnv::new();
    env.init();

    let delete = env
        .command()
        .arg("delete")
        .arg("unknown.com")
        .arg("--yes")
        .output()
        .expect("run delete");
    assert_eq!(delete.status.code(), Some(3));
}

#[test]
fn test_cli_wrong_master_key_exit_code() {
    let env = TestEnv::new();
    env.init();

    let list = env
        .command()
        .arg("list")
        .env("KEYWARDEN_MASTER_KEY", "wrong-master-key")
        .output()
        .expect("run list");
    assert_eq!(list.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&list.stderr).contains("Incorrect master key"));
}

#[test]
fn test_cli_missing_vault_exit_code() {
    let env = TestEnv::new();

    let list = env.command().arg("list").output().expect("run list");
    assert_eq!(list.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&list.stderr);
    assert!(stderr.contains("No vault found at"));
    assert!(stderr.contains("keywarden init"));
}

#[test]
fn test_cli_rotate_flow() {
    let env = TestEnv::new();
    env.init();
    env.add("alpha.net", "first-pass");
    env.add("beta.org", "second-pass");

    let rotate = env
        .command()
        .arg("rotate")
        .env("KEYWARDEN_NEW_MASTER_KEY", "rotated-master-key-456")
        .output()
        .expect("run rotate");
    assert!(
        rotate.status.success(),
        "rotate failed: stderr={}",
        String::from_utf8_lossy(&rotate.stderr)
    );
    assert!(String::from_utf8_lossy(&rotate.stdout).contains("Master key changed!"));

    // The old master key is rejected now.
    let old = env.command().arg("list").output().expect("run list");
    assert_eq!(old.status.code(), Some(5));

    // Every credential decrypts under the new key.
    let get = env
        .command()
        .arg("get")
        .arg("alpha.net")
        .env("KEYWARDEN_MASTER_KEY", "rotated-master-key-456")
        .output()
        .expect("run get");
    assert!(get.status.success());
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "first-pass");

    let get = env
        .command()
        .arg("get")
        .arg("beta.org")
        .env("KEYWARDEN_MASTER_KEY", "rotated-master-key-456")
        .output()
        .expect("run get");
    assert_eq!(String::from_utf8_lossy(&get.stdout).trim(), "second-pass");
}

#[test]
fn test_cli_generate_exact_length() {
    let env = TestEnv::new();
    let wordlist = write_wordlist(env._root.path());

    let generate = env
        .command()
        .arg("generate")
        .arg("24")
        .arg("--wordlist")
        .arg(&wordlist)
        .output()
        .expect("run generate");
    assert!(
        generate.status.success(),
        "generate failed: stderr={}",
        String::from_utf8_lossy(&generate.stderr)
    );
    let passphrase = String::from_utf8_lossy(&generate.stdout).trim().to_string();
    assert_eq!(passphrase.len(), 24);
}

#[test]
fn test_cli_generate_without_special_flag_has_none() {
    let env = TestEnv::new();
    let wordlist = write_wordlist(env._root.path());

    let generate = env
        .command()
        .arg("generate")
        .arg("32")
        .arg("--wordlist")
        .arg(&wordlist)
        .output()
        .expect("run generate");
    assert!(generate.status.success());
    let passphrase = String::from_utf8_lossy(&generate.stdout).trim().to_string();
    assert!(passphrase
        .chars()
        .all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_cli_generate_missing_wordlist_fails() {
    let env = TestEnv::new();

    let generate = env
        .command()
        .arg("generate")
        .arg("24")
        .arg("--wordlist")
        .arg(env._root.path().join("missing.txt"))
        .output()
        .expect("run generate");
    assert!(!generate.status.success());
    assert!(String::from_utf8_lossy(&generate.stderr).contains("Cannot read word list"));
}

#[test]
fn test_cli_no_command_prints_version() {
    let env = TestEnv::new();

    let output = env.command().output().expect("run keywarden");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Keywarden v"));
    assert!(stdout.contains("--help"));
}
