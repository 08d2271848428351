//! End-to-end binding tests: registration through execution for each
//! strategy, against a recording executor.

use bytes::Bytes;
use courier_bind::{BindError, BindRequest, Dispatcher, RegistrationError, RouteValues};
use courier_core::execute::{Execute, ExecutionContext, ExecutionError};
use courier_core::message::{Message, MessageKind};
use courier_core::{shape, ResultSlot};
use http::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SampleQuery {
    name: Option<String>,
    age: Option<i64>,
    #[serde(skip)]
    address: ResultSlot<String>,
}

shape! {
    SampleQuery {
        name: Option<String> => "The name to search for",
        age: Option<i64>,
    }
}

impl Message for SampleQuery {
    const KIND: MessageKind = MessageKind::Query;
    const HAS_RESULT: bool = true;

    fn take_result(&mut self) -> Option<Result<serde_json::Value, serde_json::Error>> {
        self.address.take_serialized()
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SampleCommand {
    id: i64,
    name: String,
    address: String,
    age: i64,
}

shape! {
    SampleCommand {
        id: i64 => "The record identifier",
        name: String,
        address: String,
        age: i64,
    }
}

impl Message for SampleCommand {
    const KIND: MessageKind = MessageKind::Command;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct DeleteCommand {
    id: i64,
}

shape! {
    DeleteCommand {
        id: i64,
    }
}

impl Message for DeleteCommand {
    const KIND: MessageKind = MessageKind::Command;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct PostWithoutBody {
    id: i64,
    label: Option<String>,
}

shape! {
    PostWithoutBody {
        id: i64,
        label: Option<String>,
    }
}

impl Message for PostWithoutBody {
    const KIND: MessageKind = MessageKind::Command;
    const FROM_PARAMETERS: bool = true;
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct ForgetfulCommand {
    id: i64,
    #[serde(skip)]
    receipt: ResultSlot<i64>,
}

shape! {
    ForgetfulCommand {
        id: i64,
    }
}

impl Message for ForgetfulCommand {
    const KIND: MessageKind = MessageKind::Command;
    const HAS_RESULT: bool = true;

    fn take_result(&mut self) -> Option<Result<serde_json::Value, serde_json::Error>> {
        self.receipt.take_serialized()
    }
}

/// Records every executed message as JSON for later assertions.
#[derive(Default)]
struct Recorder {
    seen: Mutex<Vec<serde_json::Value>>,
}

impl Recorder {
    fn record<M: Serialize>(&self, message: &M) {
        let value = serde_json::to_value(message).expect("messages serialize");
        self.seen.lock().expect("lock is never poisoned").push(value);
    }

    fn single(&self) -> serde_json::Value {
        let seen = self.seen.lock().expect("lock is never poisoned");
        assert_eq!(seen.len(), 1, "expected exactly one execution");
        seen[0].clone()
    }
}

impl Execute<SampleQuery> for Recorder {
    async fn execute(
        &self,
        message: &mut SampleQuery,
        _ctx: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        self.record(message);
        message.address.set("123 Main St.".to_string());
        Ok(())
    }
}

impl Execute<SampleCommand> for Recorder {
    async fn execute(
        &self,
        message: &mut SampleCommand,
        _ctx: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        self.record(message);
        Ok(())
    }
}

impl Execute<DeleteCommand> for Recorder {
    async fn execute(
        &self,
        message: &mut DeleteCommand,
        _ctx: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        self.record(message);
        Ok(())
    }
}

impl Execute<PostWithoutBody> for Recorder {
    async fn execute(
        &self,
        message: &mut PostWithoutBody,
        _ctx: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        self.record(message);
        Ok(())
    }
}

impl Execute<ForgetfulCommand> for Recorder {
    async fn execute(
        &self,
        _message: &mut ForgetfulCommand,
        _ctx: &ExecutionContext,
    ) -> Result<(), ExecutionError> {
        Ok(())
    }
}

fn dispatcher() -> Dispatcher<Recorder> {
    Dispatcher::new(Recorder::default())
}

fn body(value: serde_json::Value) -> Bytes {
    Bytes::from(serde_json::to_vec(&value).expect("json serializes"))
}

#[tokio::test]
async fn get_with_query_parameters() {
    let dispatcher = dispatcher();
    let handler = dispatcher
        .bind::<SampleQuery>(Method::GET, "/sample-query")
        .unwrap();

    let request = BindRequest::new().with_query(RouteValues::from([("name", "John")]));
    let outcome = handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.body, Some(json!("123 Main St.")));
}

#[tokio::test]
async fn get_with_route_parameters() {
    let dispatcher = dispatcher();
    let handler = dispatcher
        .bind::<SampleQuery>(Method::GET, "/sample-query/{name}/{age}")
        .unwrap();

    let request =
        BindRequest::new().with_path(RouteValues::from([("name", "John"), ("age", "30")]));
    let outcome = handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(outcome.status, StatusCode::OK);
    assert_eq!(outcome.body, Some(json!("123 Main St.")));
}

#[tokio::test]
async fn get_with_route_and_query_parameters() {
    let dispatcher = Dispatcher::from_arc(Arc::new(Recorder::default()));
    let handler = dispatcher
        .bind::<SampleQuery>(Method::GET, "/sample-query/{name}")
        .unwrap();

    let request = BindRequest::new()
        .with_path(RouteValues::from([("name", "John")]))
        .with_query(RouteValues::from([("age", "30")]));
    handler(request, ExecutionContext::new()).await.unwrap();
}

#[tokio::test]
async fn parameters_only_binds_union_of_path_and_query() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<SampleQuery>(Method::GET, "/sample-query/{name}")
        .unwrap();

    let request = BindRequest::new()
        .with_path(RouteValues::from([("name", "John")]))
        .with_query(RouteValues::from([("age", "30")]));
    handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(
        recorder.single(),
        json!({ "name": "John", "age": 30 })
    );
}

#[tokio::test]
async fn parameters_only_never_reads_body() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<SampleQuery>(Method::GET, "/sample-query")
        .unwrap();

    // A body full of would-be values must be ignored entirely.
    let request = BindRequest::new()
        .with_query(RouteValues::from([("name", "John")]))
        .with_body(body(json!({ "name": "Ignored", "age": 99 })));
    handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(recorder.single(), json!({ "name": "John", "age": null }));
}

#[tokio::test]
async fn post_with_body_binds_all_fields() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<SampleCommand>(Method::POST, "/sample-command")
        .unwrap();

    let payload = json!({ "id": 1, "name": "John", "address": "123 Main St.", "age": 30 });
    let request = BindRequest::new().with_body(body(payload.clone()));
    let outcome = handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(outcome.status, StatusCode::CREATED);
    assert_eq!(recorder.single(), payload);
}

#[tokio::test]
async fn post_with_route_and_body_prefers_route_value() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<SampleCommand>(Method::POST, "/sample-command/{id}")
        .unwrap();

    let request = BindRequest::new()
        .with_path(RouteValues::from([("id", "1")]))
        .with_body(body(
            json!({ "id": -1, "name": "John", "address": "123 Main St.", "age": 30 }),
        ));
    handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(
        recorder.single(),
        json!({ "id": 1, "name": "John", "address": "123 Main St.", "age": 30 })
    );
}

#[tokio::test]
async fn put_and_patch_bind_like_post() {
    for verb in [Method::PUT, Method::PATCH] {
        let recorder = Arc::new(Recorder::default());
        let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
        let handler = dispatcher
            .bind::<SampleCommand>(verb.clone(), "/sample-command/{id}")
            .unwrap();

        let request = BindRequest::new()
            .with_path(RouteValues::from([("id", "1")]))
            .with_body(body(
                json!({ "id": -1, "name": "John", "address": "123 Main St.", "age": 30 }),
            ));
        let outcome = handler(request, ExecutionContext::new()).await.unwrap();

        assert_eq!(outcome.status, StatusCode::NO_CONTENT);
        assert_eq!(recorder.single()["id"], json!(1));
    }
}

#[tokio::test]
async fn delete_with_route_parameters() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<DeleteCommand>(Method::DELETE, "/delete-command/{id}")
        .unwrap();

    let request = BindRequest::new().with_path(RouteValues::from([("id", "1")]));
    let outcome = handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(outcome.status, StatusCode::NO_CONTENT);
    assert_eq!(recorder.single(), json!({ "id": 1 }));
}

#[tokio::test]
async fn delete_with_query_parameters() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<DeleteCommand>(Method::DELETE, "/delete-command")
        .unwrap();

    let request = BindRequest::new().with_query(RouteValues::from([("id", "1")]));
    handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(recorder.single(), json!({ "id": 1 }));
}

#[tokio::test]
async fn from_parameters_marker_skips_body_for_post() {
    let recorder = Arc::new(Recorder::default());
    let dispatcher = Dispatcher::from_arc(Arc::clone(&recorder));
    let handler = dispatcher
        .bind::<PostWithoutBody>(Method::POST, "/post-command-without-body/{id}")
        .unwrap();

    let request = BindRequest::new().with_path(RouteValues::from([("id", "5")]));
    let outcome = handler(request, ExecutionContext::new()).await.unwrap();

    assert_eq!(outcome.status, StatusCode::CREATED);
    assert_eq!(recorder.single(), json!({ "id": 5, "label": null }));
}

#[tokio::test]
async fn missing_body_is_client_error() {
    let dispatcher = dispatcher();
    let handler = dispatcher
        .bind::<SampleCommand>(Method::POST, "/sample-command")
        .unwrap();

    let err = handler(BindRequest::new(), ExecutionContext::new())
        .await
        .unwrap_err();

    assert!(matches!(err, BindError::MissingBody));
    assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unconvertible_route_value_is_client_error() {
    let dispatcher = dispatcher();
    let handler = dispatcher
        .bind::<DeleteCommand>(Method::DELETE, "/delete-command/{id}")
        .unwrap();

    let request = BindRequest::new().with_path(RouteValues::from([("id", "not-a-number")]));
    let err = handler(request, ExecutionContext::new()).await.unwrap_err();

    assert!(matches!(err, BindError::Convert { .. }));
    let problem = err.to_problem();
    assert_eq!(problem.status, 400);
    assert!(problem.detail.expect("client detail").contains("not-a-number"));
}

#[tokio::test]
async fn missing_required_parameter_is_client_error() {
    let dispatcher = dispatcher();
    let handler = dispatcher
        .bind::<DeleteCommand>(Method::DELETE, "/delete-command/{id}")
        .unwrap();

    let err = handler(BindRequest::new(), ExecutionContext::new())
        .await
        .unwrap_err();

    assert!(matches!(err, BindError::Convert { .. }));
}

#[tokio::test]
async fn result_not_set_is_server_error() {
    let dispatcher = dispatcher();
    let handler = dispatcher
        .bind::<ForgetfulCommand>(Method::POST, "/forgetful")
        .unwrap();

    let request = BindRequest::new().with_body(body(json!({ "id": 1 })));
    let err = handler(request, ExecutionContext::new()).await.unwrap_err();

    assert!(matches!(err, BindError::ResultNotSet { .. }));
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(err.to_problem().detail.is_none());
}

#[test]
fn query_registered_without_result_fails_classification() {
    #[derive(Debug, Default, Clone, Serialize, Deserialize)]
    struct ResultlessQuery {
        id: i64,
    }

    shape! {
        ResultlessQuery {
            id: i64,
        }
    }

    impl Message for ResultlessQuery {
        const KIND: MessageKind = MessageKind::Query;
    }

    struct Noop;
    impl Execute<ResultlessQuery> for Noop {
        async fn execute(
            &self,
            _message: &mut ResultlessQuery,
            _ctx: &ExecutionContext,
        ) -> Result<(), ExecutionError> {
            Ok(())
        }
    }

    let dispatcher = Dispatcher::new(Noop);
    let err = dispatcher
        .bind::<ResultlessQuery>(Method::GET, "/resultless")
        .err()
        .expect("expected registration error");

    assert!(matches!(err, RegistrationError::Classification { .. }));
    assert!(err.to_string().contains("result"));
}

#[tokio::test]
async fn cancellation_is_forwarded_opaquely() {
    struct Observer;

    impl Execute<DeleteCommand> for Observer {
        async fn execute(
            &self,
            _message: &mut DeleteCommand,
            ctx: &ExecutionContext,
        ) -> Result<(), ExecutionError> {
            if ctx.cancellation().is_cancelled() {
                return Err(ExecutionError::timeout("cancelled upstream"));
            }
            Ok(())
        }
    }

    let dispatcher = Dispatcher::new(Observer);
    let handler = dispatcher
        .bind::<DeleteCommand>(Method::DELETE, "/delete-command/{id}")
        .unwrap();

    let cancellation = courier_core::Cancellation::new();
    cancellation.cancel();
    let ctx = ExecutionContext::new().with_cancellation(cancellation);

    let request = BindRequest::new().with_path(RouteValues::from([("id", "1")]));
    let err = handler(request, ctx).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::GATEWAY_TIMEOUT);
}
