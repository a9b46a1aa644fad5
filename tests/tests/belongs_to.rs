use pretty_assertions::assert_eq;
use rowbind::{driver::Operation, BelongsTo, Entity, FetchStrategy, ModelBuilder};
use tests::{assert_ok, assert_some, Setup};

const DDL: &str = "
    create table team (id integer primary key autoincrement, name text not null);
    create table player (id integer primary key autoincrement, name text not null, team_id integer);
";

#[derive(Debug, Default, Clone, PartialEq)]
struct Team {
    id: Option<i64>,
    name: String,
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
        model.field("name", |t| &t.name, |t| &mut t.name);
    }
}

#[derive(Debug, Default)]
struct Player {
    id: Option<i64>,
    name: String,
    team: BelongsTo<Team>,
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
            .many_to_one("team", "team_id", FetchStrategy::Eager, |p| &mut p.team);
    }
}

fn team(name: &str) -> Team {
    Team {
        id: None,
        name: name.to_string(),
    }
}

fn player(name: &str, team: Team) -> Player {
    Player {
        id: None,
        name: name.to_string(),
        team: BelongsTo::new(team),
    }
}

fn team_inserts(test: &Setup) -> usize {
    test.log().count(|op| matches!(op, Operation::Insert(_)) && op.sql().contains("into team"))
}

#[test]
fn shared_team_is_saved_once() {
    let test = Setup::new(DDL);
    let players = test.repository::<Player>();

    let first = assert_some!(assert_ok!(players.save(player("ada", team("engines")))));
    let saved_team = assert_some!(assert_ok!(first.team.get())).clone();
    assert!(saved_team.id.is_some());

    let second = assert_some!(assert_ok!(players.save(player("grace", saved_team.clone()))));
    assert_eq!(assert_ok!(second.team.get()), Some(&saved_team));

    assert_eq!(team_inserts(&test), 1);
    assert_eq!(assert_ok!(test.repository::<Team>().find_all()).len(), 1);
}

#[test]
fn unknown_team_identity_is_saved_as_new() {
    let test = Setup::new(DDL);
    let players = test.repository::<Player>();

    let phantom = Team {
        id: Some(77),
        name: "phantoms".to_string(),
    };

    let saved = assert_some!(assert_ok!(players.save(player("ada", phantom))));
    let team = assert_some!(assert_ok!(saved.team.get()));

    assert_eq!(team.name, "phantoms");
    assert_ne!(team.id, Some(77));
    assert_eq!(team_inserts(&test), 1);
}

#[test]
fn eager_many_to_one_loads_with_owner() {
    let test = Setup::new(DDL);
    let players = test.repository::<Player>();

    let saved = assert_some!(assert_ok!(players.save(player("ada", team("engines")))));

    test.log().clear();
    let found = assert_some!(assert_ok!(players.find(&saved.id.unwrap())));

    assert!(found.team.is_loaded());
    assert_eq!(assert_some!(assert_ok!(found.team.get())).name, "engines");
    assert_eq!(
        test.log().executed_sql(),
        [
            "select * from player where id = ? limit 1",
            "select * from team where id = ? limit 1",
        ]
    );
}

#[test]
fn many_players_resolve_their_teams() {
    let test = Setup::new(DDL);
    let players = test.repository::<Player>();

    let engines = assert_some!(assert_ok!(test.repository::<Team>().save(team("engines"))));
    let looms = assert_some!(assert_ok!(test.repository::<Team>().save(team("looms"))));

    assert_ok!(players.save_all([
        player("ada", engines.clone()),
        player("grace", looms.clone()),
        player("hedy", engines.clone()),
    ]));

    let found = assert_ok!(players.find_all_by_column("team_id", engines.id.unwrap()));
    let mut names: Vec<_> = found.iter().map(|p| p.name.as_str()).collect();
    names.sort();
    assert_eq!(names, ["ada", "hedy"]);

    for player in &found {
        assert_eq!(assert_ok!(player.team.get()), Some(&engines));
    }
}
