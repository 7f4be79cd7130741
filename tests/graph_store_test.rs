use propgraph::graph::{
    GraphError, GraphStore, KeySelector, Label, PropertyRemoval, RelationType, RelationshipRef,
    TypeFilter,
};

fn social_graph() -> GraphStore {
    let mut store = GraphStore::new();
    for name in ["Alice", "Bob", "Carol"] {
        store.add_entity("Person", name).unwrap();
    }
    store.add_entity("City", "Paris").unwrap();

    store.add_relationship("Alice", "Bob", "friend").unwrap();
    store.add_relationship("Alice", "Carol", "friend").unwrap();
    store.add_relationship("Alice", "Paris", "lives_in").unwrap();
    store.add_relationship("Bob", "Alice", "friend").unwrap();
    store
}

#[test]
fn test_statistics_track_mutations() {
    let mut store = social_graph();
    let stats = store.statistics();
    assert_eq!(stats.entity_count, 4);
    assert_eq!(stats.relationship_count, 4);
    assert_eq!(stats.label_count, 2);

    store.delete_entity("City", "Paris").unwrap();
    let stats = store.statistics();
    assert_eq!(stats.entity_count, 3);
    assert_eq!(stats.relationship_count, 3);
    assert_eq!(stats.label_count, 1);

    store.clear();
    assert_eq!(store.entity_count(), 0);
    assert_eq!(store.relationship_count(), 0);
    assert_eq!(store.statistics().label_count, 0);
}

#[test]
fn test_label_lookup_in_insertion_order() {
    let mut store = social_graph();
    assert_eq!(
        store.find_by_label(&Label::new("Person")).unwrap(),
        vec!["Alice", "Bob", "Carol"]
    );

    store.delete_entity("Person", "Bob").unwrap();
    assert_eq!(
        store.find_by_label(&Label::new("Person")).unwrap(),
        vec!["Alice", "Carol"]
    );
    assert_eq!(
        store.find_by_label(&Label::new("Robot")),
        Err(GraphError::LabelNotFound(Label::new("Robot")))
    );
}

#[test]
fn test_neighbors_by_type() {
    let store = social_graph();

    let all = store.neighbors("Alice", &TypeFilter::All).unwrap();
    let names: Vec<&str> = all.iter().map(|n| n.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "Carol", "Paris"]);

    let friends = store
        .neighbors("Alice", &TypeFilter::single("friend"))
        .unwrap();
    assert_eq!(friends.len(), 2);
    assert!(friends.iter().all(|n| n.relationship == RelationType::new("friend")));

    assert!(matches!(
        store.neighbors("Alice", &TypeFilter::single("enemy")),
        Err(GraphError::NoMatchingNeighbors { .. })
    ));
    assert_eq!(
        store.neighbors("Paris", &TypeFilter::All),
        Err(GraphError::NoRelationships("Paris".to_string()))
    );
    assert_eq!(
        store.neighbors("Nobody", &TypeFilter::All),
        Err(GraphError::EntityNotFound("Nobody".to_string()))
    );
}

#[test]
fn test_relationship_properties_survive_reassertion() {
    let mut store = social_graph();
    let rel = RelationshipRef::typed("Alice", "Bob", "friend");
    store.set_relationship_property(&rel, "since", "2020").unwrap();

    let assertion = store.add_relationship("Alice", "Bob", "friend").unwrap();
    assert!(!assertion.is_created());

    let relationship = store
        .relationship("Alice", "Bob", &RelationType::new("friend"))
        .unwrap();
    assert_eq!(relationship.properties.get("since"), Some("2020"));
}

#[test]
fn test_delete_properties_outcomes() {
    let mut store = social_graph();
    store
        .set_properties(
            "Alice",
            &[
                ("age".to_string(), "30".to_string()),
                ("city".to_string(), "Paris".to_string()),
            ],
        )
        .unwrap();

    let removal = store
        .delete_properties("Alice", &KeySelector::Keys(vec!["age".into(), "email".into()]))
        .unwrap();
    match removal {
        PropertyRemoval::Keys(keys) => {
            assert!(keys[0].found);
            assert!(!keys[1].found);
        }
        other => panic!("unexpected removal {:?}", other),
    }

    let removal = store.delete_properties("Alice", &KeySelector::All).unwrap();
    assert_eq!(removal, PropertyRemoval::Cleared { removed: 1 });
    assert_eq!(store.entity("Alice").unwrap().property_count(), 0);

    assert!(matches!(
        store.delete_properties("Alice", &KeySelector::Keys(vec!["age".into()])),
        Err(GraphError::NoMatchingProperty { .. })
    ));
}

#[test]
fn test_independent_stores() {
    let mut first = GraphStore::new();
    let mut second = GraphStore::new();
    first.add_entity("Person", "Alice").unwrap();
    second.add_entity("Robot", "Alice").unwrap();

    assert_eq!(first.entity("Alice").unwrap().label, Label::new("Person"));
    assert_eq!(second.entity("Alice").unwrap().label, Label::new("Robot"));
}
