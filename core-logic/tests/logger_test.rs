use core_logic::{setup_logger_with_file, RESULT_TARGET};
use std::fs;
use tempfile::tempdir;
use tracing::info;

#[test]
fn test_file_logger_writes_target_and_fields() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("run.log");
    let path_str = path.to_str().unwrap();

    let guard = setup_logger_with_file(path_str).unwrap();
    info!(target: RESULT_TARGET, token_id = "1234", "Generation SUCCESS");
    drop(guard);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("[INFO] pipeline_result: Generation SUCCESS"));
    assert!(content.contains("token_id=1234"));
}
