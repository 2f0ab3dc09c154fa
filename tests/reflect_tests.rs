use recdiff::{reflect_record, Reflect, Value};
use std::collections::{BTreeMap, HashMap};

reflect_record! {
    #[derive(Debug, Clone)]
    pub struct Article {
        pub title: String,
        pub views: u64,
        pub rating: f32,
        pub tags: Vec<String>,
        pub related: Option<Box<Article>>,
        pub extra: HashMap<String, String>,
        draft: bool,
        pub(crate) editor_note: String,
    }
}

fn sample() -> Article {
    Article {
        title: "On records".into(),
        views: 1200,
        rating: 4.5,
        tags: vec!["diff".into(), "records".into()],
        related: None,
        extra: HashMap::new(),
        draft: true,
        editor_note: "needs figures".into(),
    }
}

#[test]
fn test_integer_widening() {
    assert_eq!((-5i8).reflect(), Value::Int(-5));
    assert_eq!((-5i16).reflect(), Value::Int(-5));
    assert_eq!((-5i32).reflect(), Value::Int(-5));
    assert_eq!((-5i64).reflect(), Value::Int(-5));
    assert_eq!((-5isize).reflect(), Value::Int(-5));

    assert_eq!(5u8.reflect(), Value::UInt(5));
    assert_eq!(5u16.reflect(), Value::UInt(5));
    assert_eq!(5u32.reflect(), Value::UInt(5));
    assert_eq!(5u64.reflect(), Value::UInt(5));
    assert_eq!(5usize.reflect(), Value::UInt(5));
}

#[test]
fn test_float_widening() {
    assert_eq!(2.5f32.reflect(), Value::Float(2.5));
    assert_eq!(2.5f64.reflect(), Value::Float(2.5));
}

#[test]
fn test_scalars_and_strings() {
    assert_eq!(true.reflect(), Value::Bool(true));
    assert_eq!("abc".reflect(), Value::Str("abc".into()));
    assert_eq!(String::from("abc").reflect(), Value::Str("abc".into()));
}

#[test]
fn test_option_and_box() {
    let absent: Option<u32> = None;
    assert_eq!(absent.reflect(), Value::Optional(None));
    assert_eq!(
        Some(7u32).reflect(),
        Value::Optional(Some(Box::new(Value::UInt(7))))
    );
    assert_eq!(Box::new(7i32).reflect(), Value::Int(7));
}

#[test]
fn test_sequences() {
    let expected = Value::Seq(vec![Value::Int(1), Value::Int(2)]);
    assert_eq!(vec![1i32, 2].reflect(), expected);
    assert_eq!([1i32, 2].reflect(), expected);
    assert_eq!([1i32, 2][..].reflect(), expected);

    let empty: Vec<i32> = Vec::new();
    assert_eq!(empty.reflect(), Value::Seq(vec![]));
}

#[test]
fn test_string_keyed_maps() {
    let mut hashed = HashMap::new();
    hashed.insert("k".to_string(), 1i32);
    let Value::Map(entries) = hashed.reflect() else {
        panic!("expected a map");
    };
    assert_eq!(entries.get("k"), Some(&Value::Int(1)));

    let mut ordered = BTreeMap::new();
    ordered.insert("k".to_string(), 1i32);
    assert_eq!(ordered.reflect(), Value::Map(entries));
}

#[test]
fn test_record_fields_in_declaration_order() {
    let Value::Record(rec) = sample().reflect() else {
        panic!("expected a record");
    };
    let names: Vec<&str> = rec.fields.iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        vec![
            "title",
            "views",
            "rating",
            "tags",
            "related",
            "extra",
            "draft",
            "editor_note"
        ]
    );
}

#[test]
fn test_record_visibility_tags() {
    let Value::Record(rec) = sample().reflect() else {
        panic!("expected a record");
    };
    assert!(rec.field("title").unwrap().visible);
    assert!(rec.field("tags").unwrap().visible);
    // Private and restricted fields are hidden.
    assert!(!rec.field("draft").unwrap().visible);
    assert!(!rec.field("editor_note").unwrap().visible);
}

#[test]
fn test_record_type_name() {
    let Value::Record(rec) = sample().reflect() else {
        panic!("expected a record");
    };
    assert!(rec.type_name.ends_with("Article"));
    assert_eq!(rec.short_name(), "Article");
}

#[test]
fn test_nested_record_reflection() {
    let mut article = sample();
    article.related = Some(Box::new(sample()));

    let Value::Record(rec) = article.reflect() else {
        panic!("expected a record");
    };
    let Value::Optional(Some(inner)) = &rec.field("related").unwrap().value else {
        panic!("expected a present optional");
    };
    assert!(matches!(**inner, Value::Record(_)));
}

#[test]
fn test_reflection_is_pure() {
    let article = sample();
    assert_eq!(article.reflect(), article.reflect());
}

#[test]
fn test_hand_written_impl_for_opaque_payload() {
    struct Handle(#[allow(dead_code)] fn() -> u32);

    impl Reflect for Handle {
        fn reflect(&self) -> Value {
            Value::opaque("fn() -> u32")
        }
    }

    assert_eq!(Handle(|| 7).reflect(), Value::Opaque("fn() -> u32".into()));
}
