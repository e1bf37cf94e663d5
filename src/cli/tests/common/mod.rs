use assert_cmd::assert::Assert;
use serde_json::Value;
use std::io::Write;
use tempfile::NamedTempFile;

/// Writes module arguments to a temporary file, the way Ansible hands them to binary modules.
pub fn args_file(args: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", args).unwrap();
    file
}

/// The single JSON object a module printed on stdout.
pub fn module_output(assert: &Assert) -> Value {
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    serde_json::from_str(stdout.trim()).unwrap()
}

/// Every JSON line printed on stdout.
pub fn json_lines(assert: &Assert) -> Vec<Value> {
    String::from_utf8(assert.get_output().stdout.clone())
        .unwrap()
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}
