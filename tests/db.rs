mod common;

#[test]
fn test_creates_migrated_database() {
    let test_db = common::TestDb::new("test_migrated_database.db");
    let conn = test_db.pool().get();
    assert!(conn.is_ok());
}
