//! The process-wide dialect lives in its own test binary so no other test
//! observes the switch.

use sqlfrag::{
    DIALECT_ENV, Dialect, Marker, current_dialect, init_dialect_from_env, set_dialect,
    set_dialect_by_name, sql,
};

#[test]
fn global_dialect_switching() {
    assert_eq!(current_dialect(), Dialect::Postgres);

    let q = sql!("SELECT * FROM ", Marker::name("a.b"), " WHERE id = ", 1, "");
    assert_eq!(q.render().unwrap().text, r#"SELECT * FROM "a.b" WHERE id = $1"#);

    assert_eq!(set_dialect_by_name("mysql").unwrap(), Dialect::MySql);
    assert_eq!(q.render().unwrap().text, "SELECT * FROM `a`.`b` WHERE id = ?");
    assert_eq!(q.render_from(3).unwrap().text, "SELECT * FROM `a`.`b` WHERE id = ?");

    let err = set_dialect_by_name("oracle").unwrap_err();
    assert!(err.is_configuration());
    assert_eq!(current_dialect(), Dialect::MySql);

    assert_eq!(set_dialect(Dialect::Postgres), Dialect::MySql);
    assert_eq!(q.render_from(3).unwrap().text, r#"SELECT * FROM "a.b" WHERE id = $3"#);

    let nested = sql!("a = ", 1, "\n  AND b = ", 2, "");
    assert_eq!(nested.render_nested(2).unwrap().text, "a = $2\n  AND b = $3");

    // SAFETY: this is the only test in this binary, so nothing reads the
    // environment concurrently.
    unsafe { std::env::set_var(DIALECT_ENV, "MySQL") };
    assert_eq!(init_dialect_from_env().unwrap(), Dialect::MySql);

    unsafe { std::env::set_var(DIALECT_ENV, "sybase") };
    assert!(init_dialect_from_env().unwrap_err().is_configuration());
    assert_eq!(current_dialect(), Dialect::MySql);

    unsafe { std::env::remove_var(DIALECT_ENV) };
    assert_eq!(Dialect::from_env().unwrap(), None);
    assert_eq!(init_dialect_from_env().unwrap(), Dialect::MySql);

    set_dialect(Dialect::Postgres);
}
