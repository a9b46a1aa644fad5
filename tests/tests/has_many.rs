use pretty_assertions::assert_eq;
use rowbind::{Entity, FetchStrategy, HasMany, ModelBuilder};
use tests::{assert_empty, assert_err, assert_len, assert_ok, assert_some, Setup};

const DDL: &str = "
    create table team (id integer primary key autoincrement, name text not null);
    create table club (id integer primary key autoincrement, name text not null);
    create table player (id integer primary key autoincrement, name text not null, team_id integer);
";

#[derive(Debug, Default, Clone, PartialEq)]
struct Player {
    id: Option<i64>,
    name: String,
    team_id: Option<i64>,
}

impl Entity for Player {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |p| &p.name, |p| &mut p.name)
            .field("teamId", |p| &p.team_id, |p| &mut p.team_id);
    }
}

#[derive(Debug, Default)]
struct Team {
    id: Option<i64>,
    name: String,
    players: HasMany<Player>,
}

impl Entity for Team {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |t| &t.name, |t| &mut t.name)
            .one_to_many(
                "players",
                "team_id",
                FetchStrategy::Eager,
                |t| &mut t.players,
            );
    }
}

/// Same rows as a team, loaded on first access
#[derive(Debug, Default)]
struct Club {
    id: Option<i64>,
    name: String,
    members: HasMany<Player>,
}

impl Entity for Club {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |c| &c.name, |c| &mut c.name)
            .one_to_many(
                "members",
                "team_id",
                FetchStrategy::Lazy,
                |c| &mut c.members,
            );
    }
}

fn player(name: &str) -> Player {
    Player {
        id: None,
        name: name.to_string(),
        team_id: None,
    }
}

fn seed(test: &Setup) {
    assert_ok!(test.session().execute_batch(
        "insert into team (id, name) values (1, 'engines');
         insert into club (id, name) values (1, 'looms');
         insert into player (name, team_id) values ('ada', 1), ('grace', 1), ('hedy', null);"
    ));
}

#[test]
fn one_to_many_is_not_a_stored_column() {
    let test = Setup::new(DDL);
    let teams = test.repository::<Team>();

    let stored: Vec<_> = teams.model().stored_columns().collect();
    assert_eq!(stored, ["name"]);
    assert!(!assert_some!(teams.model().column("team_id")).is_stored());
}

#[test]
fn one_to_many_column_is_not_searchable_on_owner() {
    let test = Setup::new(DDL);
    seed(&test);
    let teams = test.repository::<Team>();
    test.log().clear();

    assert_err!(teams.find_by_column("team_id", 1_i64), is_schema_mapping);
    assert_err!(
        teams.find_all_by_column("team_id", 1_i64),
        is_schema_mapping
    );
    assert!(test.log().is_empty());
}

#[test]
fn cascade_saves_children_before_owner() {
    let test = Setup::new(DDL);
    let teams = test.repository::<Team>();
    test.log().clear();

    let team = Team {
        id: None,
        name: "engines".to_string(),
        players: HasMany::from(vec![player("ada"), player("grace")]),
    };

    let saved = assert_some!(assert_ok!(teams.save(team)));

    assert_eq!(
        test.log().executed_sql(),
        [
            "insert into player (name, team_id) values (?, ?)",
            "insert into player (name, team_id) values (?, ?)",
            "insert into team (name) values (?)",
        ]
    );

    let players = assert_ok!(saved.players.get());
    assert_len!(players, 2);
    assert!(players.iter().all(|p| p.id.is_some()));

    // Children are persisted as given; the owner's key is not written back
    assert!(players.iter().all(|p| p.team_id.is_none()));

    let found = assert_some!(assert_ok!(teams.find(&saved.id.unwrap())));
    assert_empty!(assert_ok!(found.players.get()));
}

#[test]
fn eager_one_to_many_loads_with_owner() {
    let test = Setup::new(DDL);
    seed(&test);
    let teams = test.repository::<Team>();
    let _players = test.repository::<Player>();

    test.log().clear();
    let team = assert_some!(assert_ok!(teams.find(&1)));

    assert!(team.players.is_loaded());
    assert_eq!(
        test.log().executed_sql(),
        [
            "select * from team where id = ? limit 1",
            "select * from player where team_id = ?",
        ]
    );

    let mut names: Vec<_> = assert_ok!(team.players.get())
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    names.sort();
    assert_eq!(names, ["ada", "grace"]);
}

#[test]
fn lazy_one_to_many_loads_on_first_access() {
    let test = Setup::new(DDL);
    seed(&test);
    let clubs = test.repository::<Club>();
    let _players = test.repository::<Player>();

    test.log().clear();
    let club = assert_some!(assert_ok!(clubs.find(&1)));
    assert!(!club.members.is_loaded());
    assert_eq!(test.log().queries(), 1);

    assert_len!(assert_ok!(club.members.get()), 2);
    assert_eq!(test.log().queries(), 2);

    assert_len!(assert_ok!(club.members.get()), 2);
    assert_eq!(test.log().queries(), 2);
}

#[test]
fn owner_without_children_has_empty_collection() {
    let test = Setup::new(DDL);
    let teams = test.repository::<Team>();

    let saved = assert_some!(assert_ok!(teams.save(Team {
        name: "empty".to_string(),
        ..Team::default()
    })));

    let found = assert_some!(assert_ok!(teams.find(&saved.id.unwrap())));
    assert!(found.players.is_loaded());
    assert_empty!(assert_ok!(found.players.get()));
}

#[test]
fn existing_children_are_updated() {
    let test = Setup::new(DDL);
    seed(&test);
    let teams = test.repository::<Team>();
    let players = test.repository::<Player>();

    let mut team = assert_some!(assert_ok!(teams.find(&1)));
    for player in assert_some!(team.players.get_mut()) {
        player.name = player.name.to_uppercase();
    }

    test.log().clear();
    let updated = assert_some!(assert_ok!(teams.update(team)));

    let executed = test.log().executed_sql();
    assert_eq!(
        executed.last().map(String::as_str),
        Some("update team set name = ? where id = ?")
    );
    assert!(!test.log().has_insert());

    let mut names: Vec<_> = assert_ok!(updated.players.get())
        .iter()
        .map(|p| p.name.clone())
        .collect();
    names.sort();
    assert_eq!(names, ["ADA", "GRACE"]);

    let stored = assert_ok!(players.find_all_by_column("team_id", 1_i64));
    assert!(stored.iter().all(|p| p.name.chars().all(|c| c.is_uppercase())));
    assert_len!(assert_ok!(players.find_all()), 3);
}

#[test]
fn unloaded_collection_is_skipped_on_update() {
    let test = Setup::new(DDL);
    seed(&test);
    let clubs = test.repository::<Club>();
    let _players = test.repository::<Player>();

    let mut club = assert_some!(assert_ok!(clubs.find(&1)));
    club.name = "mills".to_string();

    test.log().clear();
    let updated = assert_some!(assert_ok!(clubs.update(club)));

    assert_eq!(
        test.log().executed_sql(),
        ["update club set name = ? where id = ?"]
    );
    assert!(!updated.members.is_loaded());
    assert_len!(assert_ok!(updated.members.get()), 2);
}
