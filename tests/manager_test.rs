use graph_driver::{
    ClientConfig, DriverError, Edge, EdgeQuery, GraphElement, GraphManager, Id, KeyValues,
    PropertyValue, Vertex, VertexQuery,
};

fn person(manager: &GraphManager, name: &str, age: i64) -> Vertex {
    manager
        .add_vertex_with(
            KeyValues::new()
                .label("person")
                .property("name", name)
                .property("age", age),
        )
        .unwrap()
}

#[test]
fn test_vertex_round_trip() {
    let manager = GraphManager::in_memory();
    let marko = person(&manager, "marko", 29);

    let id = marko.id().unwrap().clone();
    let fetched = manager.get_vertex(&id).unwrap();
    assert_eq!(fetched, marko);
    assert!(fetched.is_attached());
    assert_eq!(
        fetched.property("name"),
        Some(&PropertyValue::String("marko".to_string()))
    );

    manager.remove_vertex(&id).unwrap();
    assert!(matches!(manager.get_vertex(&id), Err(DriverError::NotFound(_))));
    assert!(matches!(manager.remove_vertex(&id), Err(DriverError::NotFound(_))));
}

#[test]
fn test_key_value_validation() {
    let manager = GraphManager::in_memory();

    let odd = KeyValues::from(vec![PropertyValue::from("name")]);
    let err = manager.add_vertex_with(odd).unwrap_err();
    assert!(matches!(err, DriverError::Argument(msg) if msg.contains("even")));

    let bad_id = KeyValues::new().pair("~id", 1.5).label("person");
    assert!(matches!(
        manager.add_vertex_with(bad_id),
        Err(DriverError::Argument(_))
    ));
}

#[test]
fn test_batch_vertices_attached_in_order() {
    let manager = GraphManager::in_memory();
    let names = ["marko", "vadas", "josh", "peter"];
    let batch: Vec<Vertex> = names
        .iter()
        .map(|name| {
            let mut vertex = Vertex::new("person");
            vertex.set_property("name", *name).unwrap();
            vertex
        })
        .collect();

    let created = manager.add_vertices(batch).unwrap();
    assert_eq!(created.len(), names.len());
    for (vertex, name) in created.iter().zip(names) {
        assert!(vertex.is_attached());
        let stored = manager.get_vertex(vertex.id().unwrap()).unwrap();
        assert_eq!(stored.property("name").unwrap().as_string(), Some(name));
    }

    // Batch results update themselves without re-attachment
    let mut vadas = created[1].clone();
    vadas.append_property("age", 27).unwrap();
    vadas.eliminate_property("name").unwrap();
    let stored = manager.get_vertex(vadas.id().unwrap()).unwrap();
    assert_eq!(stored.property("age").unwrap().as_integer(), Some(27));
    assert!(!stored.has_property("name"));
    assert_eq!(stored, vadas);
}

#[test]
fn test_batch_edges_update_through_attachment() {
    let manager = GraphManager::in_memory();
    let marko = person(&manager, "marko", 29);
    let vadas = person(&manager, "vadas", 27);
    let (m, v) = (marko.id().unwrap().clone(), vadas.id().unwrap().clone());

    let mut knows = Edge::between(m.clone(), "knows", v.clone());
    knows.set_property("weight", 0.5).unwrap();
    let mut created = manager
        .add_edges(vec![knows, Edge::between(v, "knows", m)], true)
        .unwrap();
    assert!(created.iter().all(|e| e.is_attached()));

    let first = &mut created[0];
    first.append_property("since", 2010).unwrap();
    first.eliminate_property("weight").unwrap();
    let stored = manager.get_edge(first.id().unwrap()).unwrap();
    assert_eq!(stored.property("since").unwrap().as_integer(), Some(2010));
    assert!(!stored.has_property("weight"));
}

#[test]
fn test_iterate_large_listing() {
    let manager = GraphManager::in_memory();
    for i in 0..23 {
        person(&manager, &format!("p{}", i), i);
    }
    manager.add_vertex(Vertex::new("software")).unwrap();

    let people: Vec<Vertex> = manager
        .iterate_vertices(&VertexQuery::new().label("person"), 5)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(people.len(), 23);
    let ages: Vec<i64> = people
        .iter()
        .map(|v| v.property("age").unwrap().as_integer().unwrap())
        .collect();
    assert_eq!(ages, (0..23).collect::<Vec<i64>>());

    // Limit is ignored by iteration
    let everything = manager
        .iterate_vertices(&VertexQuery::new().limit(2), manager.page_size())
        .unwrap()
        .count();
    assert_eq!(everything, 24);

    let bounded = manager.list_vertices(&VertexQuery::new().limit(2)).unwrap();
    assert_eq!(bounded.len(), 2);
}

#[test]
fn test_iteration_restarts_from_first_page() {
    let manager = GraphManager::in_memory();
    for i in 0..3 {
        person(&manager, "p", i);
    }
    let query = VertexQuery::new();
    assert_eq!(manager.iterate_vertices(&query, 2).unwrap().count(), 3);
    assert_eq!(manager.iterate_vertices(&query, 2).unwrap().count(), 3);
}

#[test]
fn test_entity_property_updates() {
    let manager = GraphManager::in_memory();
    let mut marko = person(&manager, "marko", 29);

    marko.append_property("city", "rome").unwrap();
    assert_eq!(marko.property("city").unwrap().as_string(), Some("rome"));
    let stored = manager.get_vertex(marko.id().unwrap()).unwrap();
    assert_eq!(stored.property_count(), 3);

    marko.eliminate_property("age").unwrap();
    assert!(!marko.has_property("age"));
    let stored = manager.get_vertex(marko.id().unwrap()).unwrap();
    assert!(!stored.has_property("age"));
}

#[test]
fn test_detached_and_orphaned_entities() {
    let mut local = Vertex::new("person");
    local.set_id(7).unwrap();
    assert!(matches!(
        local.append_property("name", "x"),
        Err(DriverError::InvalidOperation(_))
    ));

    let mut orphan = {
        let manager = GraphManager::in_memory();
        person(&manager, "marko", 29)
    };
    assert!(orphan.is_attached());
    assert!(matches!(
        orphan.append_property("city", "rome"),
        Err(DriverError::Protocol(_))
    ));
}

#[test]
fn test_attached_vertex_label_is_fixed() {
    let manager = GraphManager::in_memory();
    let mut marko = person(&manager, "marko", 29);
    assert!(matches!(
        marko.set_label("software"),
        Err(DriverError::InvalidOperation(_))
    ));
    assert_eq!(marko.label(), Some("person"));
}

#[test]
fn test_edges_and_directions() {
    let manager = GraphManager::in_memory();
    let marko = person(&manager, "marko", 29);
    let vadas = person(&manager, "vadas", 27);
    let josh = person(&manager, "josh", 32);

    let knows = manager
        .add_edge_between(&marko, "knows", &vadas, KeyValues::new().property("weight", 0.5))
        .unwrap();
    manager
        .add_edge_with(
            marko.id().unwrap().clone(),
            "knows",
            josh.id().unwrap().clone(),
            KeyValues::new().property("weight", 1.0),
        )
        .unwrap();
    manager
        .add_edge_with(josh.id().unwrap().clone(), "likes", marko.id().unwrap().clone(), KeyValues::new())
        .unwrap();

    assert_eq!(knows.source_label(), Some("person"));
    let marko_id = marko.id().unwrap().clone();

    let out = manager
        .list_edges(&EdgeQuery::of_vertex(marko_id.clone()).direction(graph_driver::Direction::Out))
        .unwrap();
    assert_eq!(out.len(), 2);
    let both = manager.list_edges(&EdgeQuery::of_vertex(marko_id.clone())).unwrap();
    assert_eq!(both.len(), 3);
    let heavy = manager
        .list_edges(&EdgeQuery::new().property("weight", 1.0))
        .unwrap();
    assert_eq!(heavy.len(), 1);

    let paged = manager
        .iterate_edges(&EdgeQuery::new().label("knows"), 1)
        .unwrap()
        .collect::<Result<Vec<Edge>, _>>()
        .unwrap();
    assert_eq!(paged.len(), 2);
    assert!(paged.iter().all(|e| e.is_attached()));

    // Removing a vertex takes its edges with it
    manager.remove_vertex(&marko_id).unwrap();
    assert!(manager.list_edges(&EdgeQuery::new()).unwrap().is_empty());
}

#[test]
fn test_edge_to_missing_vertex() {
    let manager = GraphManager::in_memory();
    let marko = person(&manager, "marko", 29);
    let err = manager
        .add_edge_with(marko.id().unwrap().clone(), "knows", Id::from("ghost"), KeyValues::new())
        .unwrap_err();
    assert!(matches!(err, DriverError::NotFound(_)));
}

#[test]
fn test_connect_rejects_invalid_config() {
    let config = ClientConfig::from_yaml_str("url: http://localhost:8080\ngraph: _system\n");
    assert!(matches!(config, Err(DriverError::Validation(_))));

    let mut config = ClientConfig::default();
    config.page_size = 0;
    assert!(matches!(
        GraphManager::connect(&config),
        Err(DriverError::Config(_))
    ));
}
