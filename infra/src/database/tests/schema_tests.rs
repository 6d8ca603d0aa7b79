//! Checks on the table definitions

use crate::database::schema::{CREATE_PERSISTENT_TOKEN_TABLE, CREATE_USER_TABLE, STATEMENTS};

#[test]
fn test_user_table_created_first() {
    assert_eq!(STATEMENTS[0], CREATE_USER_TABLE);
    assert_eq!(STATEMENTS[1], CREATE_PERSISTENT_TOKEN_TABLE);
}

#[test]
fn test_persistent_token_columns() {
    let ddl = CREATE_PERSISTENT_TOKEN_TABLE;
    assert!(ddl.contains("series VARCHAR(20) CHARACTER SET ascii COLLATE ascii_bin NOT NULL PRIMARY KEY"));
    assert!(ddl.contains("token_value VARCHAR(20) CHARACTER SET ascii COLLATE ascii_bin NOT NULL"));
    assert!(ddl.contains("user_id CHAR(36) NOT NULL"));
    assert!(ddl.contains("token_date DATE NOT NULL"));
    assert!(ddl.contains("ip_address VARCHAR(39)"));
    assert!(ddl.contains("user_agent VARCHAR(255)"));
    assert!(ddl.contains("INDEX idx_persistent_token_date (token_date)"));
}

#[test]
fn test_statements_are_idempotent() {
    assert!(STATEMENTS.iter().all(|s| s.contains("IF NOT EXISTS")));
}
