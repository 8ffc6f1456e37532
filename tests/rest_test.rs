//! Drives the blocking REST collaborators against an in-process axum server
//! that speaks the vertex/edge wire format on top of a `MemoryGraph`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};

use graph_driver::{
    ClientConfig, Direction, DriverError, Edge, EdgeQuery, EdgeResource, GraphElement,
    GraphManager, Id, KeyValues, MemoryGraph, PropertyMap, Vertex, VertexQuery, VertexResource,
};

#[derive(Default)]
struct FakeServer {
    graph: MemoryGraph,
    vertex_pages: Mutex<Vec<Option<String>>>,
}

type Shared = State<Arc<FakeServer>>;
type Params = Query<HashMap<String, String>>;

struct ApiError(DriverError);

impl From<DriverError> for ApiError {
    fn from(e: DriverError) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            DriverError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            DriverError::Server { status, message } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                message,
            ),
            other => (StatusCode::BAD_REQUEST, other.to_string()),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

fn bad_request(message: String) -> ApiError {
    ApiError(DriverError::Server {
        status: 400,
        message,
    })
}

fn parse_id(raw: &str) -> Result<Id, ApiError> {
    serde_json::from_str(raw).map_err(|e| bad_request(format!("invalid id {}: {}", raw, e)))
}

fn parse_limit(params: &HashMap<String, String>) -> Option<usize> {
    params
        .get("limit")
        .and_then(|l| l.parse::<i64>().ok())
        .filter(|l| *l >= 0)
        .map(|l| l as usize)
}

fn parse_properties(params: &HashMap<String, String>) -> Result<PropertyMap, ApiError> {
    match params.get("properties") {
        Some(raw) => serde_json::from_str(raw).map_err(|e| bad_request(e.to_string())),
        None => Ok(PropertyMap::new()),
    }
}

async fn create_vertex(State(s): Shared, Json(vertex): Json<Vertex>) -> Result<Json<Vertex>, ApiError> {
    Ok(Json(VertexResource::create(&s.graph, &vertex)?))
}

async fn create_vertices(
    State(s): Shared,
    Json(vertices): Json<Vec<Vertex>>,
) -> Result<Json<Vec<Id>>, ApiError> {
    Ok(Json(VertexResource::create_batch(&s.graph, &vertices)?))
}

async fn get_vertex(State(s): Shared, Path((_, id)): Path<(String, String)>) -> Result<Json<Vertex>, ApiError> {
    Ok(Json(VertexResource::get(&s.graph, &parse_id(&id)?)?))
}

async fn list_vertices(State(s): Shared, Query(params): Params) -> Result<Json<serde_json::Value>, ApiError> {
    let mut query = VertexQuery::new();
    query.label = params.get("label").cloned();
    query.properties = parse_properties(&params)?;
    let page = params.get("page").cloned();
    if let Ok(mut pages) = s.vertex_pages.lock() {
        pages.push(page.clone());
    }
    let answer = VertexResource::list(&s.graph, &query, page.as_deref(), parse_limit(&params))?;
    Ok(Json(json!({ "vertices": answer.results, "page": answer.page })))
}

async fn update_vertex(
    State(s): Shared,
    Path((_, id)): Path<(String, String)>,
    Query(params): Params,
    Json(vertex): Json<Vertex>,
) -> Result<Json<Vertex>, ApiError> {
    if vertex.id() != Some(&parse_id(&id)?) {
        return Err(bad_request("vertex id mismatch".to_string()));
    }
    let updated = match params.get("action").map(String::as_str) {
        Some("append") => VertexResource::append(&s.graph, &vertex)?,
        Some("eliminate") => VertexResource::eliminate(&s.graph, &vertex)?,
        other => return Err(bad_request(format!("unknown action {:?}", other))),
    };
    Ok(Json(updated))
}

async fn delete_vertex(State(s): Shared, Path((_, id)): Path<(String, String)>) -> Result<StatusCode, ApiError> {
    VertexResource::delete(&s.graph, &parse_id(&id)?)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn create_edge(State(s): Shared, Json(edge): Json<Edge>) -> Result<Json<Edge>, ApiError> {
    Ok(Json(EdgeResource::create(&s.graph, &edge)?))
}

async fn create_edges(
    State(s): Shared,
    Query(params): Params,
    Json(edges): Json<Vec<Edge>>,
) -> Result<Json<Vec<String>>, ApiError> {
    let check_vertex = params.get("check_vertex").map(String::as_str) != Some("false");
    Ok(Json(EdgeResource::create_batch(&s.graph, &edges, check_vertex)?))
}

async fn get_edge(State(s): Shared, Path((_, id)): Path<(String, String)>) -> Result<Json<Edge>, ApiError> {
    Ok(Json(EdgeResource::get(&s.graph, &id)?))
}

async fn list_edges(State(s): Shared, Query(params): Params) -> Result<Json<serde_json::Value>, ApiError> {
    let mut query = EdgeQuery::new();
    query.vertex_id = params.get("vertex_id").map(|raw| parse_id(raw)).transpose()?;
    query.direction = params
        .get("direction")
        .map(|d| serde_json::from_value::<Direction>(json!(d)))
        .transpose()
        .map_err(|e| bad_request(e.to_string()))?;
    query.label = params.get("label").cloned();
    query.properties = parse_properties(&params)?;
    let page = params.get("page").cloned();
    let answer = EdgeResource::list(&s.graph, &query, page.as_deref(), parse_limit(&params))?;
    Ok(Json(json!({ "edges": answer.results, "page": answer.page })))
}

async fn update_edge(
    State(s): Shared,
    Path((_, id)): Path<(String, String)>,
    Query(params): Params,
    Json(edge): Json<Edge>,
) -> Result<Json<Edge>, ApiError> {
    if edge.id() != Some(id.as_str()) {
        return Err(bad_request("edge id mismatch".to_string()));
    }
    let updated = match params.get("action").map(String::as_str) {
        Some("append") => EdgeResource::append(&s.graph, &edge)?,
        Some("eliminate") => EdgeResource::eliminate(&s.graph, &edge)?,
        other => return Err(bad_request(format!("unknown action {:?}", other))),
    };
    Ok(Json(updated))
}

async fn delete_edge(State(s): Shared, Path((_, id)): Path<(String, String)>) -> Result<StatusCode, ApiError> {
    EdgeResource::delete(&s.graph, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Start a fake server on an ephemeral port; returns its state and base url
fn start_server() -> (Arc<FakeServer>, String) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let state = Arc::new(FakeServer::default());
    let app = Router::new()
        .route(
            "/graphs/:graph/graph/vertices",
            get(list_vertices).post(create_vertex),
        )
        .route("/graphs/:graph/graph/vertices/batch", post(create_vertices))
        .route(
            "/graphs/:graph/graph/vertices/:id",
            get(get_vertex).put(update_vertex).delete(delete_vertex),
        )
        .route("/graphs/:graph/graph/edges", get(list_edges).post(create_edge))
        .route("/graphs/:graph/graph/edges/batch", post(create_edges))
        .route(
            "/graphs/:graph/graph/edges/:id",
            get(get_edge).put(update_edge).delete(delete_edge),
        )
        .with_state(Arc::clone(&state));

    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    let addr = rx.recv().unwrap();
    (state, format!("http://{}", addr))
}

fn connect(url: &str) -> GraphManager {
    let mut config = ClientConfig::new(url, "hugegraph");
    config.timeout_secs = 5;
    GraphManager::connect(&config).unwrap()
}

#[test]
fn test_vertex_round_trip_over_http() {
    let (_, url) = start_server();
    let manager = connect(&url);

    let marko = manager
        .add_vertex_with(
            KeyValues::new()
                .id("1:marko")
                .label("person")
                .property("name", "marko")
                .property("age", 29),
        )
        .unwrap();
    assert!(marko.is_attached());
    assert_eq!(marko.id(), Some(&Id::from("1:marko")));

    let fetched = manager.get_vertex(&Id::from("1:marko")).unwrap();
    assert_eq!(fetched, marko);
    assert_eq!(fetched.property("age").unwrap().as_integer(), Some(29));

    manager.remove_vertex(&Id::from("1:marko")).unwrap();
    let err = manager.get_vertex(&Id::from("1:marko")).unwrap_err();
    assert!(matches!(err, DriverError::NotFound(message) if message.contains("1:marko")));
}

#[test]
fn test_server_errors_carry_status() {
    let (_, url) = start_server();
    let manager = connect(&url);

    let err = manager.add_vertex(Vertex::default()).unwrap_err();
    assert!(matches!(err, DriverError::Server { status: 400, .. }));
}

#[test]
fn test_batch_ids_follow_request_order() {
    let (_, url) = start_server();
    let manager = connect(&url);

    let vertices: Vec<Vertex> = ["a", "b", "c"]
        .iter()
        .map(|name| {
            let mut vertex = Vertex::new("person");
            vertex.set_property("name", *name).unwrap();
            vertex
        })
        .collect();
    let created = manager.add_vertices(vertices).unwrap();

    let ids: Vec<Id> = created.iter().map(|v| v.id().unwrap().clone()).collect();
    assert_eq!(ids, vec![Id::Number(1), Id::Number(2), Id::Number(3)]);
    assert!(created.iter().all(|v| v.is_attached()));
    assert_eq!(
        manager.get_vertex(&Id::Number(2)).unwrap().property("name").unwrap().as_string(),
        Some("b")
    );

    let mut b = created[1].clone();
    b.append_property("rank", 1).unwrap();
    b.eliminate_property("name").unwrap();
    let stored = manager.get_vertex(&Id::Number(2)).unwrap();
    assert_eq!(stored.property("rank").unwrap().as_integer(), Some(1));
    assert!(!stored.has_property("name"));
}

#[test]
fn test_iteration_walks_page_tokens() {
    let (state, url) = start_server();
    let manager = connect(&url);

    for i in 0..5 {
        manager
            .add_vertex_with(KeyValues::new().label("person").property("rank", i))
            .unwrap();
    }

    let all: Vec<Vertex> = manager
        .iterate_vertices(&VertexQuery::new().label("person"), 2)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|v| v.is_attached()));

    let pages = state.vertex_pages.lock().unwrap().clone();
    assert_eq!(
        pages,
        vec![Some(String::new()), Some("2".to_string()), Some("4".to_string())]
    );
}

#[test]
fn test_bounded_listing_is_unpaged() {
    let (state, url) = start_server();
    let manager = connect(&url);

    for i in 0..4 {
        manager
            .add_vertex_with(KeyValues::new().label("person").property("rank", i))
            .unwrap();
    }

    let some = manager.list_vertices(&VertexQuery::new().limit(3)).unwrap();
    assert_eq!(some.len(), 3);
    let ranked = manager
        .list_vertices(&VertexQuery::new().property("rank", 2))
        .unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(*state.vertex_pages.lock().unwrap(), vec![None, None]);
}

#[test]
fn test_edges_over_http() {
    let (_, url) = start_server();
    let manager = connect(&url);

    let marko = manager.add_vertex(Vertex::new("person")).unwrap();
    let lop = manager.add_vertex(Vertex::new("software")).unwrap();
    let mut created = manager
        .add_edge_between(&marko, "created", &lop, KeyValues::new().property("weight", 0.4))
        .unwrap();
    assert!(created.is_attached());
    assert_eq!(created.source_label(), Some("person"));
    assert_eq!(created.target_label(), Some("software"));

    let edge_id = created.id().unwrap().to_string();
    assert_eq!(manager.get_edge(&edge_id).unwrap(), created);

    let marko_id = marko.id().unwrap().clone();
    let lop_id = lop.id().unwrap().clone();
    assert_eq!(manager.get_edges(marko_id.clone(), Direction::Out).unwrap().len(), 1);
    assert_eq!(manager.get_edges(marko_id, Direction::In).unwrap().len(), 0);
    assert_eq!(manager.get_edges(lop_id, Direction::In).unwrap().len(), 1);

    created.append_property("since", 2009).unwrap();
    assert_eq!(created.property_count(), 2);
    created.eliminate_property("weight").unwrap();
    assert!(!created.has_property("weight"));
    assert_eq!(manager.get_edge(&edge_id).unwrap().property_count(), 1);

    manager.remove_edge(&edge_id).unwrap();
    assert!(matches!(manager.get_edge(&edge_id), Err(DriverError::NotFound(_))));
}

#[test]
fn test_edge_batch_with_vertex_check() {
    let (_, url) = start_server();
    let manager = connect(&url);

    let a = manager.add_vertex(Vertex::new("person")).unwrap();
    let a_id = a.id().unwrap().clone();
    let dangling = vec![Edge::between(a_id.clone(), "knows", 42)];

    assert!(matches!(
        manager.add_edges(dangling.clone(), true),
        Err(DriverError::NotFound(_))
    ));
    let mut created = manager.add_edges(dangling, false).unwrap();
    assert_eq!(created.len(), 1);
    assert!(created[0].id().is_some());
    assert!(created[0].is_attached());

    let edge = &mut created[0];
    edge.append_property("weight", 0.8).unwrap();
    assert_eq!(edge.property("weight").unwrap().as_float(), Some(0.8));
    let stored = manager.get_edge(edge.id().unwrap()).unwrap();
    assert_eq!(stored.property("weight").unwrap().as_float(), Some(0.8));

    edge.eliminate_property("weight").unwrap();
    assert_eq!(manager.get_edge(edge.id().unwrap()).unwrap().property_count(), 0);
}
