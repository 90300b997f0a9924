//! Mapper behaviour through the public API, against a scripted executor.

mod common;

use chrono::{DateTime, TimeZone, Utc};
use common::{Reply, ScriptedExecutor};
use sqlforge::{
    Column, CompiledStatement, Locale, Mapping, OrmError, Predicate, Row, StringListConverter,
    UniqueStringGenerator, Value,
};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Status {
    #[default]
    Active,
    Retired,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Active => "ACTIVE",
            Status::Retired => "RETIRED",
        })
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(Status::Active),
            "RETIRED" => Ok(Status::Retired),
            other => Err(format!("unknown status {other}")),
        }
    }
}

sqlforge::string_enum_field!(Status);

#[derive(Debug, Default, Clone, PartialEq)]
struct Address {
    street: String,
    city: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Customer {
    code: String,
    version: i64,
    name: String,
    status: Status,
    locale: Locale,
    tags: Vec<String>,
    attributes: BTreeMap<String, String>,
    joined: Option<DateTime<Utc>>,
    address: Option<Address>,
}

fn customers() -> Mapping<Customer> {
    Mapping::new("customer")
        .with_alias("c")
        .id(Column::field("code", |c: &Customer| &c.code, |c: &mut Customer| &mut c.code))
        .version(Column::field(
            "version",
            |c: &Customer| &c.version,
            |c: &mut Customer| &mut c.version,
        ))
        .column(Column::field("name", |c: &Customer| &c.name, |c: &mut Customer| &mut c.name))
        .column(Column::field(
            "status",
            |c: &Customer| &c.status,
            |c: &mut Customer| &mut c.status,
        ))
        .column(Column::field(
            "locale",
            |c: &Customer| &c.locale,
            |c: &mut Customer| &mut c.locale,
        ))
        .column(
            Column::field("tags", |c: &Customer| &c.tags, |c: &mut Customer| &mut c.tags)
                .converter(StringListConverter::new()),
        )
        .column(
            Column::field(
                "attributes",
                |c: &Customer| &c.attributes,
                |c: &mut Customer| &mut c.attributes,
            )
            .column_name("attrs"),
        )
        .column(Column::field(
            "joined",
            |c: &Customer| &c.joined,
            |c: &mut Customer| &mut c.joined,
        ))
        .column(Column::nested(
            "address.street",
            |c: &Customer| c.address.as_ref().map(|a| &a.street),
            |c: &mut Customer| Some(&mut c.address.get_or_insert_with(Address::default).street),
        ))
        .column(Column::nested(
            "address.city",
            |c: &Customer| c.address.as_ref().map(|a| &a.city),
            |c: &mut Customer| Some(&mut c.address.get_or_insert_with(Address::default).city),
        ))
}

fn joined() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
}

fn sample() -> Customer {
    Customer {
        code: "C-1".to_string(),
        version: 0,
        name: "Bobo".to_string(),
        status: Status::Retired,
        locale: Locale::new("fr", "CA", ""),
        tags: vec!["vip".to_string(), "a,b".to_string()],
        attributes: BTreeMap::from([("tier".to_string(), "gold".to_string())]),
        joined: Some(joined()),
        address: Some(Address {
            street: "123 Main".to_string(),
            city: None,
        }),
    }
}

fn sample_row() -> Row {
    Row::from_pairs([
        ("code", Value::from("C-1")),
        ("version", Value::Int(0)),
        ("name", Value::from("Bobo")),
        ("status", Value::from("RETIRED")),
        ("locale", Value::from("fr_CA")),
        ("tags", Value::from("vip,a\\,b")),
        ("attrs", Value::from("tier=gold")),
        ("joined", Value::Timestamp(joined())),
        ("street", Value::from("123 Main")),
        ("city", Value::Null),
    ])
}

#[tokio::test]
async fn insert_converts_every_column() {
    let conn = ScriptedExecutor::new([Reply::Affected(1)]);
    let mut customer = sample();
    customers().insert(&conn, &mut customer).await.unwrap();

    assert_eq!(
        conn.calls(),
        vec![CompiledStatement::new(
            "insert into customer (code, version, name, status, locale, tags, attrs, joined, street, city) \
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
            vec![
                Value::from("C-1"),
                Value::Int(0),
                Value::from("Bobo"),
                Value::from("RETIRED"),
                Value::from("fr_CA"),
                Value::from("vip,a\\,b"),
                Value::from("tier=gold"),
                Value::Timestamp(joined()),
                Value::from("123 Main"),
                Value::Null,
            ]
        )]
    );
}

#[tokio::test]
async fn find_by_id_reads_every_column() {
    let conn = ScriptedExecutor::new([Reply::Rows(vec![sample_row()])]);
    let customer = customers().find_by_id(&conn, "C-1").await.unwrap();

    assert_eq!(customer, sample());
    assert_eq!(
        conn.calls()[0].sql,
        "select c.code, c.version, c.name, c.status, c.locale, c.tags, c.attrs, c.joined, \
         c.street, c.city from customer c where c.code = $1"
    );
}

#[tokio::test]
async fn defaults_and_absent_address_store_as_null() {
    let conn = ScriptedExecutor::new([Reply::Affected(1)]);
    let mut customer = Customer {
        code: "C-2".to_string(),
        ..Customer::default()
    };
    customers().insert(&conn, &mut customer).await.unwrap();

    let calls = conn.calls();
    let values = &calls[0].values;
    assert_eq!(values[5], Value::from(""));
    assert_eq!(values[7], Value::Null);
    assert_eq!(values[8], Value::Null);
    assert_eq!(values[9], Value::Null);
}

#[tokio::test]
async fn absent_address_reloads_as_absent() {
    let mapping = customers();
    let conn = ScriptedExecutor::new([Reply::Affected(1)]);
    let mut customer = Customer {
        code: "C-2".to_string(),
        ..Customer::default()
    };
    mapping.insert(&conn, &mut customer).await.unwrap();

    let stored = conn.calls().remove(0).values;
    let labels = [
        "code", "version", "name", "status", "locale", "tags", "attrs", "joined", "street", "city",
    ];
    let row = Row::from_pairs(labels.into_iter().zip(stored));
    let conn = ScriptedExecutor::new([Reply::Rows(vec![row])]);
    let loaded = mapping.find_by_id(&conn, "C-2").await.unwrap();

    assert_eq!(loaded.address, None);
    assert_eq!(loaded, customer);
}

#[tokio::test]
async fn bad_enum_value_fails_the_load() {
    let broken = Row::from_pairs([
        ("code", Value::from("C-1")),
        ("version", Value::Int(0)),
        ("name", Value::from("Bobo")),
        ("status", Value::from("ON_LEAVE")),
    ]);
    let conn = ScriptedExecutor::new([Reply::Rows(vec![broken])]);
    let err = customers().find_by_id(&conn, "C-1").await.unwrap_err();
    assert!(matches!(err, OrmError::Conversion(_)));
}

#[tokio::test]
async fn optimistic_lock_round_trip() {
    let mapping = customers();
    let conn = ScriptedExecutor::new([
        Reply::Affected(1),
        Reply::Affected(1),
        Reply::Affected(0),
        Reply::Rows(vec![Row::from_pairs([("count", 1i64)])]),
    ]);

    let mut current = sample();
    mapping.insert(&conn, &mut current).await.unwrap();
    let mut stale = current.clone();

    current.name = "Bezu".to_string();
    mapping.update(&conn, &mut current).await.unwrap();
    assert_eq!(current.version, 1);

    stale.name = "Boffo".to_string();
    let err = mapping.update(&conn, &mut stale).await.unwrap_err();
    assert!(err.is_optimistic_lock());
    assert_eq!(
        err.to_string(),
        "Could not update row in table customer with id C-1"
    );
}

#[tokio::test]
async fn assign_id_with_generated_string() {
    let conn = ScriptedExecutor::default();
    let mut customer = Customer::default();
    customers()
        .assign_id(&conn, &mut customer, &UniqueStringGenerator::new(12))
        .await
        .unwrap();

    assert_eq!(customer.code.len(), 12);
    assert!(customer.code.chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(conn.calls().is_empty());
}

#[tokio::test]
async fn find_where_with_exists() {
    let conn = ScriptedExecutor::new([Reply::Rows(vec![])]);
    let found = customers()
        .find_where(
            Predicate::exists("orders o")
                .where_("o.customer_code = c.code")
                .where_pred(Predicate::gte("o.total", 100)),
        )
        .unwrap()
        .and(Predicate::eq("c.status", "ACTIVE"))
        .fetch_opt(&conn)
        .await
        .unwrap();

    assert!(found.is_none());
    let calls = conn.calls();
    let call = &calls[0];
    assert!(call.sql.ends_with(
        "where exists (select 1 from orders o where o.customer_code = c.code and o.total >= $1) \
         and c.status = $2"
    ));
    assert_eq!(call.values, vec![Value::Int(100), Value::from("ACTIVE")]);
}
