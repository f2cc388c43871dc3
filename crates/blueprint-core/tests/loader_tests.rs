//! Loader integration tests over the shared fixtures

use blueprint_core::{
    ErrorKind, LinkError, LoadError, Loader, ObjectRef, PathError, Value, MAX_LINK_DEPTH,
    MAX_LIST_GROWTH,
};
use blueprint_test_utils::{
    bare_context, fixture_context, init_tracing, path, read, read_value, Impl, Struct, Timeouts,
};
use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::time::Duration;

fn map_loader() -> Loader {
    init_tracing();
    Loader::with_context(Value::Map(IndexMap::new()), fixture_context())
}

#[test]
fn struct_graph_scenario() {
    let mut loader = map_loader();

    loader.add(&path("string"), "blah");
    loader.add(&path("int"), 10);
    loader.add(&path("float32"), 10.10);

    loader.link(&path("link-a"), &path("link-b"));
    loader.link(&path("link-b"), &path("string"));
    loader.link(&path("link-c"), &path("link-b"));

    loader.link(&path("W"), &path("X.base"));

    loader.instantiate(&path("X"), std::any::type_name::<Struct>());
    loader.add(&path("X.i"), 20);
    loader.link(&path("X.s"), &path("string"));
    loader.instantiate(&path("X.base"), "Impl");
    loader.add(&path("X.base.i"), 30);
    loader.link(&path("X.base.s"), &path("X.s"));

    loader.link(&path("Y"), &path("X"));

    loader.instantiate(&path("Z"), "Impl");
    loader.link(&path("Z.i"), &path("Y.i"));
    loader.link(&path("Z.s"), &path("Y.base.s"));

    assert!(loader.errors().is_empty());
    let root = loader.finish().unwrap();
    let values = root.as_map().unwrap();

    let mut keys: Vec<_> = values.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["W", "X", "Y", "Z", "float32", "int", "link-a", "link-b", "link-c", "string"]
    );

    assert_eq!(values["string"], Value::from("blah"));
    assert_eq!(values["int"], Value::Int(10));
    assert_eq!(values["float32"], Value::Float(10.10));
    for key in ["link-a", "link-b", "link-c"] {
        assert_eq!(values[key], Value::from("blah"), "{key}");
    }

    let x = read_value::<Struct>(&values["X"]).unwrap();
    assert_eq!((x.i, x.s.as_str()), (20, "blah"));
    let base = x.base.unwrap();
    assert_eq!(
        read::<Impl>(&base).unwrap(),
        Impl {
            i: 30,
            s: "blah".to_string()
        }
    );

    assert_eq!(values["Y"], values["X"]);
    assert!(values["W"].as_object().unwrap().ptr_eq(&base));

    assert_eq!(
        read_value::<Impl>(&values["Z"]).unwrap(),
        Impl {
            i: 20,
            s: "blah".to_string()
        }
    );
}

#[test]
fn link_declaration_order_does_not_matter() {
    let mut loader = map_loader();
    loader.link(&path("a.x"), &path("b"));
    loader.link(&path("b"), &path("c"));
    loader.add(&path("c"), "v");

    let root = loader.finish().unwrap();
    assert_eq!(path("a.x").get(&root).unwrap(), Value::from("v"));
    assert_eq!(path("b").get(&root).unwrap(), Value::from("v"));
}

const GRAPH_LINKS: [(&str, &str); 8] = [
    ("a", "b"),
    ("b.x", "c"),
    ("b.y", "n"),
    ("d", "a.y.k"),
    ("w", "b"),
    ("w.z", "c"),
    ("items.1", "c"),
    ("e", "items"),
];

fn load_graph(links: &[(&str, &str)]) -> Value {
    let mut loader = map_loader();
    loader.add(&path("c"), "v");
    loader.add(&path("n.k"), 1);
    loader.add(&path("items"), Value::List(Vec::new()));
    for (source, target) in links {
        loader.link(&path(source), &path(target));
    }
    loader.finish().unwrap()
}

#[test]
fn container_links_collect_every_link_beneath_them() {
    let root = load_graph(&GRAPH_LINKS);

    let mut y = IndexMap::new();
    y.insert("k".to_string(), Value::Int(1));
    let mut b = IndexMap::new();
    b.insert("x".to_string(), Value::from("v"));
    b.insert("y".to_string(), Value::Map(y));
    b.insert("z".to_string(), Value::from("v"));
    let b = Value::Map(b);

    for key in ["a", "b", "w"] {
        assert_eq!(path(key).get(&root).unwrap(), b, "{key}");
    }
    assert_eq!(path("d").get(&root).unwrap(), Value::Int(1));
    let items = Value::List(vec![Value::Null, Value::from("v")]);
    assert_eq!(path("items").get(&root).unwrap(), items);
    assert_eq!(path("e").get(&root).unwrap(), items);
}

proptest! {
    #[test]
    fn any_declaration_order_builds_the_same_tree(
        links in Just(GRAPH_LINKS.to_vec()).prop_shuffle()
    ) {
        prop_assert_eq!(load_graph(&links), load_graph(&GRAPH_LINKS));
    }
}

#[test]
fn converter_fallback_parses_durations() {
    let mut loader = map_loader();
    loader.instantiate(&path("t"), "Timeouts");
    loader.add(&path("t.idle"), "5s");
    loader.add(&path("t.read"), "1m30s");

    let root = loader.finish().unwrap();
    let timeouts = read_value::<Timeouts>(&path("t").get(&root).unwrap()).unwrap();
    assert_eq!(
        timeouts,
        Timeouts {
            idle: Duration::from_secs(5),
            read: Duration::from_secs(90),
        }
    );
}

#[test]
fn missing_converter_leaves_field_unset() {
    init_tracing();
    let timeouts = ObjectRef::new(Timeouts::default());
    let mut loader = Loader::with_context(Value::Object(timeouts.clone()), bare_context());
    loader.add(&path("idle"), "5s");

    let errors = loader.finish().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::InvalidType]);
    assert_eq!(errors.at("idle").count(), 1);
    assert_eq!(read::<Timeouts>(&timeouts).unwrap().idle, Duration::ZERO);
}

#[test]
fn non_text_input_is_not_converted() {
    let mut loader = map_loader();
    loader.instantiate(&path("t"), "Timeouts");
    loader.add(&path("t.idle"), 5);

    let errors = loader.finish().unwrap_err();
    assert_eq!(
        errors.records()[0].cause,
        LoadError::Path(PathError::InvalidType {
            expected: blueprint_core::Kind::Duration,
            found: "int".to_string(),
        })
    );
}

#[test]
fn errors_aggregate_across_operations() {
    let mut loader = map_loader();
    loader.add(&path("text"), "t");
    loader.add(&path("text.inner"), 1);
    loader.instantiate(&path("thing"), "Missing");
    loader.link(&path("dangling"), &path("nowhere"));
    loader.instantiate(&path("obj"), "Impl");
    loader.add(&path("obj.i"), "not an int");

    let errors = loader.finish().unwrap_err();
    assert_eq!(
        errors.kinds(),
        vec![
            ErrorKind::InvalidPath,
            ErrorKind::UnknownType,
            ErrorKind::InvalidType,
            ErrorKind::UnresolvedLink,
        ]
    );

    let rendered = errors.to_string();
    assert_eq!(rendered.lines().count(), 4);
    assert!(rendered.lines().all(|line| line.ends_with('\'')));
    assert_eq!(errors.at("dangling").count(), 1);
}

#[test]
fn populates_object_root_in_place() {
    init_tracing();
    let target = ObjectRef::new(Struct::default());
    let mut loader = Loader::with_context(Value::Object(target.clone()), fixture_context());
    loader.add(&path("i"), 7);
    loader.instantiate(&path("base"), "Impl");
    loader.link(&path("s"), &path("base.s"));
    loader.add(&path("base.s"), "shared");

    let root = loader.finish().unwrap();
    assert!(root.as_object().unwrap().ptr_eq(&target));

    let finished = read::<Struct>(&target).unwrap();
    assert_eq!(finished.i, 7);
    assert_eq!(finished.s, "shared");
    assert!(finished.base.is_some());
}

#[test]
fn link_through_empty_object_slot_fails() {
    let mut loader = map_loader();
    loader.instantiate(&path("x"), "Struct");
    loader.link(&path("w"), &path("x.base"));

    let errors = loader.finish().unwrap_err();
    assert!(matches!(
        errors.records()[0].cause,
        LoadError::UnresolvedLink(LinkError::EmptyTarget { .. })
    ));
}

#[test]
fn long_link_chains_are_bounded() {
    let mut loader = map_loader();
    loader.add(&path("end"), "v");
    for i in 0..=MAX_LINK_DEPTH {
        let next = if i == MAX_LINK_DEPTH {
            "end".to_string()
        } else {
            format!("n{}", i + 1)
        };
        loader.link(&path(&format!("n{i}")), &path(&next));
    }

    // n0 needs 129 hops to reach "end", n1 needs exactly 128
    let errors = loader.finish().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors.records()[0].path, path("n0"));
}

#[test]
fn links_lift_through_linked_prefixes() {
    let mut loader = map_loader();
    loader.link(&path("W"), &path("X.base"));
    loader.instantiate(&path("X"), "Struct");
    loader.instantiate(&path("X.base"), "Impl");
    loader.add(&path("X.base.i"), 30);
    loader.link(&path("lifted"), &path("W.i"));

    let root = loader.finish().unwrap();
    assert_eq!(path("lifted").get(&root).unwrap(), Value::Int(30));
    assert_eq!(path("W.i").get(&root).unwrap(), Value::Int(30));
}

#[test]
fn huge_list_index_is_recorded_not_allocated() {
    let mut loader = map_loader();
    loader.add(&path("items"), Value::List(Vec::new()));
    loader.add(&path(&format!("items.{}", u64::MAX)), 1);
    loader.add(&path(&format!("items.{MAX_LIST_GROWTH}")), 1);
    loader.add(&path("items.1"), "kept");

    let errors = loader.finish().unwrap_err();
    assert_eq!(errors.kinds(), vec![ErrorKind::InvalidPath, ErrorKind::InvalidPath]);
    assert_eq!(errors.at(&format!("items.{}", u64::MAX)).count(), 1);
}
