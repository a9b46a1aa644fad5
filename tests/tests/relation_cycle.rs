use pretty_assertions::assert_eq;
use rowbind::{BelongsTo, Entity, FetchStrategy, HasMany, HasOne, ModelBuilder};
use tests::{assert_len, assert_ok, assert_some, Setup};

const DDL: &str = "
    create table person (id integer primary key autoincrement, name text not null, partner_id integer);
    create table team (id integer primary key autoincrement, name text not null);
    create table player (id integer primary key autoincrement, name text not null, team_id integer);

    insert into person (id, name, partner_id) values (1, 'pierre', 2), (2, 'marie', 1), (3, 'alfred', 3);
    insert into team (id, name) values (1, 'engines');
    insert into player (id, name, team_id) values (10, 'ada', 1), (11, 'grace', 1);

    create table husband (id integer primary key autoincrement, name text not null, wife_id integer);
    create table wife (id integer primary key autoincrement, name text not null, husband_id integer);
    insert into husband (id, name, wife_id) values (1, 'pierre', 1);
    insert into wife (id, name, husband_id) values (1, 'marie', 1);
";

#[derive(Debug, Default)]
struct Person {
    id: Option<i64>,
    name: String,
    partner: BelongsTo<Person>,
}

impl Entity for Person {
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
            .many_to_one(
                "partner",
                "partner_id",
                FetchStrategy::Eager,
                |p| &mut p.partner,
            );
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

#[derive(Debug, Default)]
struct Husband {
    id: Option<i64>,
    name: String,
    wife: HasOne<Wife>,
}

impl Entity for Husband {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |h| &h.name, |h| &mut h.name)
            .one_to_one("wife", "wife_id", FetchStrategy::Eager, |h| &mut h.wife);
    }
}

#[derive(Debug, Default)]
struct Wife {
    id: Option<i64>,
    name: String,
    husband: HasOne<Husband>,
}

impl Entity for Wife {
    type Key = i64;

    fn id(&self) -> Option<&i64> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<i64>) {
        self.id = id;
    }

    fn schema(model: &mut ModelBuilder<Self>) {
        model
            .field("name", |w| &w.name, |w| &mut w.name)
            .one_to_one(
                "husband",
                "husband_id",
                FetchStrategy::Eager,
                |w| &mut w.husband,
            );
    }
}

#[test]
fn mutual_partners_terminate() {
    let test = Setup::new(DDL);
    let people = test.repository::<Person>();

    test.log().clear();
    let pierre = assert_some!(assert_ok!(people.find(&1)));
    assert_eq!(test.log().queries(), 2);

    assert!(pierre.partner.is_loaded());
    let marie = assert_some!(assert_ok!(pierre.partner.get()));
    assert_eq!(marie.name, "marie");

    // The back edge was deferred rather than followed
    assert!(!marie.partner.is_loaded());
    assert_eq!(marie.partner.key(), Some(&rowbind::stmt::Value::I64(1)));

    let back = assert_some!(assert_ok!(marie.partner.get()));
    assert_eq!(back.name, "pierre");
    assert_eq!(back.id, pierre.id);
}

#[test]
fn self_reference_terminates() {
    let test = Setup::new(DDL);
    let people = test.repository::<Person>();

    test.log().clear();
    let alfred = assert_some!(assert_ok!(people.find(&3)));
    assert_eq!(test.log().queries(), 1);

    assert!(!alfred.partner.is_loaded());
    let partner = assert_some!(assert_ok!(alfred.partner.get()));
    assert_eq!(partner.name, "alfred");
}

#[test]
fn find_all_over_a_cycle_terminates() {
    let test = Setup::new(DDL);
    let people = test.repository::<Person>();

    let everyone = assert_ok!(people.find_all());
    assert_len!(everyone, 3);

    for person in &everyone {
        assert!(assert_ok!(person.partner.get()).is_some());
    }
}

#[test]
fn owner_and_children_referencing_each_other_terminate() {
    let test = Setup::new(DDL);
    let teams = test.repository::<Team>();
    let _players = test.repository::<Player>();

    test.log().clear();
    let team = assert_some!(assert_ok!(teams.find(&1)));

    // The team, then its players; each player's team is already being
    // materialized
    assert_eq!(test.log().queries(), 2);

    let players = assert_ok!(team.players.get());
    assert_len!(players, 2);

    for player in players {
        assert!(!player.team.is_loaded());
        let team_again = assert_some!(assert_ok!(player.team.get()));
        assert_eq!(team_again.name, "engines");
        assert_len!(assert_ok!(team_again.players.get()), 2);
    }
}

#[test]
fn player_first_also_terminates() {
    let test = Setup::new(DDL);
    let players = test.repository::<Player>();

    let ada = assert_some!(assert_ok!(players.find(&10)));
    let team = assert_some!(assert_ok!(ada.team.get()));
    assert_eq!(team.name, "engines");

    let names: Vec<_> = assert_ok!(team.players.get())
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_len!(names, 2);
}

#[test]
fn mutual_one_to_one_terminates() {
    let test = Setup::new(DDL);
    let husbands = test.repository::<Husband>();
    let _wives = test.repository::<Wife>();

    test.log().clear();
    let pierre = assert_some!(assert_ok!(husbands.find(&1)));
    assert_eq!(test.log().queries(), 2);

    let marie = assert_some!(assert_ok!(pierre.wife.get()));
    assert_eq!(marie.name, "marie");
    assert!(!marie.husband.is_loaded());

    let back = assert_some!(assert_ok!(marie.husband.get()));
    assert_eq!(back.name, "pierre");
    assert_eq!(test.log().queries(), 4);
}

#[test]
fn mutual_one_to_one_saves_through_the_cycle() {
    let test = Setup::new(DDL);
    let husbands = test.repository::<Husband>();

    let wife = Wife {
        name: "irene".to_string(),
        ..Wife::default()
    };

    let saved = assert_some!(assert_ok!(husbands.save(Husband {
        id: None,
        name: "frederic".to_string(),
        wife: HasOne::new(wife),
    })));

    let found = assert_some!(assert_ok!(husbands.find(&saved.id.unwrap())));
    assert_eq!(assert_some!(assert_ok!(found.wife.get())).name, "irene");
}
