use pretty_assertions::assert_eq;
use rowbind::{driver::Operation, stmt::Value, Entity, FetchStrategy, HasOne, ModelBuilder};
use tests::{assert_none, assert_ok, assert_some, Setup};

const DDL: &str = "
    create table profile (id integer primary key autoincrement, bio text not null);
    create table user (id integer primary key autoincrement, name text not null, profile_id integer);
    create table member (id integer primary key autoincrement, name text not null, profile_id integer);
";

#[derive(Debug, Default, Clone, PartialEq)]
struct Profile {
    id: Option<i64>,
    bio: String,
}

impl Entity for Profile {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model.field("bio", |p| &p.bio, |p| &mut p.bio);
    }
}

/// Loads its profile on first access
#[derive(Debug, Default)]
struct User {
    id: Option<i64>,
    name: String,
    profile: HasOne<Profile>,
}

impl Entity for User {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |u| &u.name, |u| &mut u.name)
            .one_to_one(
                "profile",
                "profile_id",
                FetchStrategy::Lazy,
                |u| &mut u.profile,
            );
    }
}

/// Loads its profile with the row
#[derive(Debug, Default)]
struct Member {
    id: Option<i64>,
    name: String,
    profile: HasOne<Profile>,
}

impl Entity for Member {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |m| &m.name, |m| &mut m.name)
            .one_to_one(
                "profile",
                "profile_id",
                FetchStrategy::Eager,
                |m| &mut m.profile,
            );
    }
}

fn profile(bio: &str) -> Profile {
    Profile {
        id: None,
        bio: bio.to_string(),
    }
}

fn user(name: &str, profile: Option<Profile>) -> User {
    let mut user = User {
        name: name.to_string(),
        ..User::default()
    };
    user.profile.set(profile);
    user
}

#[test]
fn cascade_saves_new_related_entity_first() {
    let test = Setup::new(DDL);
    let users = test.repository::<User>();
    let _profiles = test.repository::<Profile>();
    test.log().clear();

    let saved = assert_some!(assert_ok!(users.save(user("ada", Some(profile("analyst"))))));

    let inserts: Vec<_> = test.log().executed_sql();
    assert_eq!(
        inserts,
        [
            "insert into profile (bio) values (?)",
            "insert into user (name, profile_id) values (?, ?)",
        ]
    );

    let related = assert_some!(assert_ok!(saved.profile.get()));
    let profile_id = assert_some!(related.id);

    test.log().with_ops(|ops| {
        assert_eq!(ops[1].operation.params()[1], Value::I64(profile_id));
    });
}

#[test]
fn cascade_replaces_related_with_stored_copy() {
    let test = Setup::new(DDL);
    let users = test.repository::<User>();
    let profiles = test.repository::<Profile>();

    let stored = assert_some!(assert_ok!(profiles.save(profile("analyst"))));

    let stale = Profile {
        id: stored.id,
        bio: "edited but never saved".to_string(),
    };

    let saved = assert_some!(assert_ok!(users.save(user("ada", Some(stale)))));
    assert_eq!(assert_ok!(saved.profile.get()), Some(&stored));
    assert_eq!(assert_ok!(profiles.find_all()).len(), 1);
}

#[test]
fn lazy_relation_loads_once_on_first_access() {
    let test = Setup::new(DDL);
    let users = test.repository::<User>();

    let saved = assert_some!(assert_ok!(users.save(user("ada", Some(profile("analyst"))))));
    let expected = assert_some!(assert_ok!(saved.profile.get())).clone();

    test.log().clear();
    let found = assert_some!(assert_ok!(users.find(&saved.id.unwrap())));
    assert_eq!(test.log().queries(), 1);

    assert!(!found.profile.is_loaded());
    assert_eq!(found.profile.key(), Some(&Value::I64(expected.id.unwrap())));

    assert_eq!(assert_ok!(found.profile.get()), Some(&expected));
    assert_eq!(test.log().queries(), 2);

    let (op, _) = assert_some!(test.log().pop());
    assert_eq!(op.sql(), "select * from user where id = ? limit 1");
    let (op, _) = assert_some!(test.log().pop());
    assert_eq!(op.sql(), "select * from profile where id = ? limit 1");

    assert_eq!(assert_ok!(found.profile.get()), Some(&expected));
    assert_eq!(test.log().queries(), 0);
    assert!(found.profile.is_loaded());
}

#[test]
fn eager_relation_loads_with_owner() {
    let test = Setup::new(DDL);
    let members = test.repository::<Member>();

    let mut member = Member {
        name: "grace".to_string(),
        ..Member::default()
    };
    member.profile.set(Some(profile("admiral")));
    let saved = assert_some!(assert_ok!(members.save(member)));

    test.log().clear();
    let found = assert_some!(assert_ok!(members.find(&saved.id.unwrap())));
    assert_eq!(test.log().queries(), 2);

    assert!(found.profile.is_loaded());
    assert_eq!(assert_some!(assert_ok!(found.profile.get())).bio, "admiral");
    assert_eq!(test.log().queries(), 2);
}

#[test]
fn null_key_means_no_related_entity() {
    let test = Setup::new(DDL);
    let users = test.repository::<User>();
    let members = test.repository::<Member>();

    let saved = assert_some!(assert_ok!(users.save(user("solo", None))));
    assert_ok!(members.save(Member {
        name: "solo".to_string(),
        ..Member::default()
    }));

    test.log().clear();
    let found = assert_some!(assert_ok!(users.find(&saved.id.unwrap())));
    assert!(found.profile.is_loaded());
    assert_none!(assert_ok!(found.profile.get()));

    let member = assert_some!(assert_ok!(members.find_by_column("name", "solo")));
    assert_none!(assert_ok!(member.profile.get()));

    assert_eq!(test.log().queries(), 2);
}

#[test]
fn saving_unloaded_relation_keeps_stored_key() {
    let test = Setup::new(DDL);
    let users = test.repository::<User>();

    let saved = assert_some!(assert_ok!(users.save(user("ada", Some(profile("analyst"))))));
    let profile_id = assert_some!(assert_ok!(saved.profile.get())).id.unwrap();

    let mut found = assert_some!(assert_ok!(users.find(&saved.id.unwrap())));
    found.name = "ada lovelace".to_string();

    test.log().clear();
    let updated = assert_some!(assert_ok!(users.update(found)));
    assert!(!updated.profile.is_loaded());

    // Only the owner's update ran; the relation was neither loaded nor saved
    let (op, _) = assert_some!(test.log().pop());
    assert!(matches!(op, Operation::ExecSql(_)));
    assert_eq!(
        op.params(),
        [
            Value::from("ada lovelace"),
            Value::I64(profile_id),
            saved_id(&updated),
        ]
    );
    assert!(test.log().is_empty());

    let reloaded = assert_some!(assert_ok!(users.find(&updated.id.unwrap())));
    assert_eq!(
        assert_some!(assert_ok!(reloaded.profile.get())).bio,
        "analyst"
    );
}

fn saved_id(user: &User) -> Value {
    Value::I64(user.id.unwrap())
}
