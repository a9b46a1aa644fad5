//! The shared connection is process-wide, so this file holds a single test
//! that walks through provisioning in order.

use pretty_assertions::assert_eq;
use rowbind::{connection, Entity, ModelBuilder, Repository, Session};
use rowbind_driver_sqlite::Sqlite;
use std::sync::Arc;
use tests::{assert_err, assert_ok, assert_some};

#[derive(Debug, Default, Clone, PartialEq)]
struct Note {
    id: Option<i64>,
    body: String,
}

impl Entity for Note {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model.field("body", |n| &n.body, |n| &mut n.body);
    }
}

#[test]
fn shared_connection_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();

    assert!(!connection::is_installed());
    assert_err!(connection::shared(), is_configuration);
    assert_err!(Repository::<Note>::of(), is_configuration);

    assert_ok!(connection::install(Sqlite::in_memory()));
    assert!(connection::is_installed());

    let err = assert_err!(connection::install(Sqlite::in_memory()), is_configuration);
    assert!(err.to_string().contains("already installed"), "{err}");

    let first = assert_ok!(connection::shared());
    let second = assert_ok!(connection::shared());
    assert!(Arc::ptr_eq(&first, &second));

    let session = assert_ok!(Session::shared());
    assert_ok!(session.execute_batch(
        "create table note (id integer primary key autoincrement, body text not null);"
    ));

    // A second session sees the same database
    let notes = assert_ok!(Repository::<Note>::of());
    let saved = assert_some!(assert_ok!(notes.save(Note {
        id: None,
        body: "hello".to_string(),
    })));

    let other = assert_ok!(Repository::<Note>::new(&assert_ok!(Session::shared())));
    assert_eq!(assert_ok!(other.find(&saved.id.unwrap())), Some(saved));
}
