use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use bytes::Bytes;
use connect::{
    async_trait,
    ClientOptions,
    Code,
    Codec,
    ConnectError,
    HandlerOptions,
    HttpClient,
    Request,
    Response,
};
use http::{HeaderValue, StatusCode};
use proto::v1::projects_service_connect::*;
use proto::v1::*;
use tower::ServiceExt;

#[derive(Default)]
struct EchoProjects {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl ProjectsServiceHandler for EchoProjects {
    async fn create_project(
        &self,
        request: Request<CreateProjectRequest>,
    ) -> Result<Response<CreateProjectResponse>, ConnectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request = request.into_message();
        Ok(Response::new(CreateProjectResponse {
            project: Some(Project {
                name: request.name,
                slug: request.slug,
                clone_url: request.clone_url,
                team_id: request.team_id,
                user_id: request.user_id,
                settings: request.settings,
                ..Default::default()
            }),
        }))
    }

    async fn get_project(
        &self,
        request: Request<GetProjectRequest>,
    ) -> Result<Response<GetProjectResponse>, ConnectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let project_id = request.into_message().project_id;
        match project_id.as_str() {
            | "missing" => {
                return Err(ConnectError::not_found("project missing not found"))
            }
            | "gone" => {
                return Err(tonic::Status::failed_precondition("gone").into())
            }
            | "slow" => tokio::time::sleep(Duration::from_secs(5)).await,
            | _ => {}
        }
        let mut response = Response::new(GetProjectResponse {
            project: Some(Project {
                id: project_id,
                creation_time: Some(pbjson_types::Timestamp {
                    seconds: 1_680_000_000,
                    nanos: 0,
                }),
                ..Default::default()
            }),
        });
        response
            .trailers_mut()
            .insert("x-served-by", HeaderValue::from_static("echo"));
        Ok(response)
    }

    async fn list_projects(
        &self,
        request: Request<ListProjectsRequest>,
    ) -> Result<Response<ListProjectsResponse>, ConnectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let request = request.into_message();
        let page_size = request.pagination.map(|p| p.page_size).unwrap_or(25);
        let projects = (0..page_size)
            .map(|i| {
                Project {
                    id: format!("project-{i}"),
                    team_id: request.team_id.clone(),
                    name: format!("A project with a reasonably long name {i}"),
                    ..Default::default()
                }
            })
            .collect();
        Ok(Response::new(ListProjectsResponse {
            projects,
            total_results: page_size,
        }))
    }

    async fn delete_project(
        &self,
        _request: Request<DeleteProjectRequest>,
    ) -> Result<Response<DeleteProjectResponse>, ConnectError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Response::new(DeleteProjectResponse {}))
    }
}

async fn serve(router: Router) -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let server = axum::Server::from_tcp(listener)
        .unwrap()
        .serve(router.into_make_service());
    tokio::spawn(async move {
        server.await.unwrap();
    });
    format!("http://{addr}")
}

async fn serve_echo(options: HandlerOptions) -> (String, Arc<AtomicUsize>) {
    let echo = EchoProjects::default();
    let calls = echo.calls.clone();
    let (_, router) = projects_service_handler(echo, options);
    (serve(router).await, calls)
}

// Records the URI of every exchange and answers with an empty message.
#[derive(Default)]
struct RecordingClient {
    uris: Mutex<Vec<String>>,
}

#[async_trait]
impl HttpClient for RecordingClient {
    async fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, ConnectError> {
        self.uris.lock().unwrap().push(request.uri().to_string());
        let mut response = http::Response::new(Bytes::new());
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/proto"),
        );
        Ok(response)
    }
}

// Observes the content-encoding of replies on the way through.
struct EncodingSpy {
    inner: reqwest::Client,
    encodings: Mutex<Vec<Option<String>>>,
}

#[async_trait]
impl HttpClient for EncodingSpy {
    async fn execute(
        &self,
        request: http::Request<Bytes>,
    ) -> Result<http::Response<Bytes>, ConnectError> {
        let response = HttpClient::execute(&self.inner, request).await?;
        let encoding = response
            .headers()
            .get(http::header::CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        self.encodings.lock().unwrap().push(encoding);
        Ok(response)
    }
}

#[test]
fn names_and_procedures() {
    assert_eq!(PROJECTS_SERVICE_NAME, "gitpod.experimental.v1.ProjectsService");
    assert_eq!(
        PROCEDURES,
        &[
            "/gitpod.experimental.v1.ProjectsService/CreateProject",
            "/gitpod.experimental.v1.ProjectsService/GetProject",
            "/gitpod.experimental.v1.ProjectsService/ListProjects",
            "/gitpod.experimental.v1.ProjectsService/DeleteProject",
        ]
    );
}

#[tokio::test]
async fn client_targets_exact_paths_regardless_of_trailing_slash() {
    for base_url in ["http://x/", "http://x"] {
        let recorder = Arc::new(RecordingClient::default());
        let client = ProjectsServiceClient::new(
            recorder.clone(),
            base_url,
            ClientOptions::new(),
        );

        client
            .create_project(CreateProjectRequest::default().into())
            .await
            .unwrap();
        client
            .get_project(GetProjectRequest::default().into())
            .await
            .unwrap();
        client
            .list_projects(ListProjectsRequest::default().into())
            .await
            .unwrap();
        client
            .delete_project(DeleteProjectRequest::default().into())
            .await
            .unwrap();

        let uris = recorder.uris.lock().unwrap().clone();
        let expected: Vec<String> =
            PROCEDURES.iter().map(|p| format!("http://x{p}")).collect();
        assert_eq!(uris, expected, "base url {base_url}");
    }
}

#[tokio::test]
async fn registrar_routes_every_procedure() {
    let (prefix, router) = projects_service_handler(
        UnimplementedProjectsServiceHandler,
        HandlerOptions::new(),
    );
    assert_eq!(prefix, "/gitpod.experimental.v1.ProjectsService/");

    for procedure in PROCEDURES {
        assert!(procedure.starts_with(prefix));
        let response = router
            .clone()
            .oneshot(
                http::Request::builder()
                    .method("POST")
                    .uri(*procedure)
                    .header("content-type", "application/proto")
                    .body(hyper::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::NOT_IMPLEMENTED,
            "{procedure}"
        );
    }

    let response = router
        .oneshot(
            http::Request::builder()
                .method("POST")
                .uri("/gitpod.experimental.v1.ProjectsService/RenameProject")
                .header("content-type", "application/proto")
                .body(hyper::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unimplemented_handler_names_every_method() {
    let svc = UnimplementedProjectsServiceHandler;

    let errors = [
        svc.create_project(CreateProjectRequest::default().into())
            .await
            .unwrap_err(),
        svc.get_project(GetProjectRequest::default().into())
            .await
            .unwrap_err(),
        svc.list_projects(ListProjectsRequest::default().into())
            .await
            .unwrap_err(),
        svc.delete_project(DeleteProjectRequest::default().into())
            .await
            .unwrap_err(),
    ];
    let methods =
        ["CreateProject", "GetProject", "ListProjects", "DeleteProject"];
    for (err, method) in errors.iter().zip(methods) {
        assert_eq!(err.code(), Code::Unimplemented);
        assert_eq!(
            err.message(),
            format!("{PROJECTS_SERVICE_NAME}.{method} is not implemented")
        );
    }
}

#[tokio::test]
async fn unimplemented_over_the_wire() {
    let (_, router) = projects_service_handler(
        UnimplementedProjectsServiceHandler,
        HandlerOptions::new(),
    );
    let base_url = serve(router).await;
    let client = ProjectsServiceClient::new(
        reqwest::Client::new(),
        &base_url,
        ClientOptions::new(),
    );

    let err = client
        .delete_project(
            DeleteProjectRequest {
                project_id: "p1".to_owned(),
            }
            .into(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::Unimplemented);
    assert_eq!(
        err.message(),
        "gitpod.experimental.v1.ProjectsService.DeleteProject is not implemented"
    );
}

#[tokio::test]
async fn echo_round_trip() {
    let (base_url, calls) = serve_echo(HandlerOptions::new()).await;

    for base_url in [format!("{base_url}/"), base_url] {
        let client = ProjectsServiceClient::new(
            reqwest::Client::new(),
            &base_url,
            ClientOptions::new(),
        );
        let response = client
            .create_project(
                CreateProjectRequest {
                    name: "gitpod".to_owned(),
                    slug: "gitpod-io".to_owned(),
                    clone_url: "https://github.com/gitpod-io/gitpod.git"
                        .to_owned(),
                    team_id: "t1".to_owned(),
                    settings: Some(ProjectSettings {
                        prebuild: Some(PrebuildSettings {
                            prebuild_every_nth: 10,
                            ..Default::default()
                        }),
                        workspace: None,
                    }),
                    ..Default::default()
                }
                .into(),
            )
            .await
            .unwrap();

        let project = response.into_message().project.unwrap();
        assert_eq!(project.name, "gitpod");
        assert_eq!(project.slug, "gitpod-io");
        assert_eq!(project.team_id, "t1");
        assert_eq!(
            project.settings.unwrap().prebuild.unwrap().prebuild_every_nth,
            10
        );
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn concurrent_calls_stay_isolated() {
    let (base_url, _) = serve_echo(HandlerOptions::new()).await;
    let client = ProjectsServiceClient::new(
        reqwest::Client::new(),
        &base_url,
        ClientOptions::new(),
    );

    let mut tasks = Vec::new();
    for i in 0..32 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            let name = format!("project-{i}");
            let response = client
                .create_project(
                    CreateProjectRequest {
                        name: name.clone(),
                        ..Default::default()
                    }
                    .into(),
                )
                .await
                .unwrap();
            (name, response.into_message().project.unwrap().name)
        }));
    }
    for task in tasks {
        let (sent, received) = task.await.unwrap();
        assert_eq!(sent, received);
    }
}

#[tokio::test]
async fn json_codec_with_gzip_replies() {
    let (base_url, _) =
        serve_echo(HandlerOptions::new().compress_min_bytes(256)).await;
    let spy = Arc::new(EncodingSpy {
        inner: reqwest::Client::new(),
        encodings: Mutex::new(Vec::new()),
    });
    let client = ProjectsServiceClient::new(
        spy.clone(),
        &base_url,
        ClientOptions::new().codec(Codec::Json),
    );

    let response = client
        .list_projects(
            ListProjectsRequest {
                team_id: "t1".to_owned(),
                pagination: Some(Pagination {
                    page_size: 40,
                    page: 1,
                }),
                ..Default::default()
            }
            .into(),
        )
        .await
        .unwrap();
    let list = response.into_message();
    assert_eq!(list.total_results, 40);
    assert_eq!(list.projects.len(), 40);
    assert!(list.projects.iter().all(|p| p.team_id == "t1"));

    // Below the threshold replies are sent as-is.
    client
        .delete_project(DeleteProjectRequest::default().into())
        .await
        .unwrap();

    let encodings = spy.encodings.lock().unwrap().clone();
    assert_eq!(encodings, vec![Some("gzip".to_owned()), None]);
}

#[tokio::test]
async fn timestamps_and_trailers_survive_the_trip() {
    let (base_url, _) = serve_echo(HandlerOptions::new()).await;
    let client = ProjectsServiceClient::new(
        reqwest::Client::new(),
        &base_url,
        ClientOptions::new().codec(Codec::Json),
    );

    let response = client
        .get_project(
            GetProjectRequest {
                project_id: "p1".to_owned(),
            }
            .into(),
        )
        .await
        .unwrap();
    assert_eq!(response.trailers().get("x-served-by").unwrap(), "echo");
    assert!(response.headers().get("trailer-x-served-by").is_none());
    let project = response.into_message().project.unwrap();
    assert_eq!(project.id, "p1");
    assert_eq!(project.creation_time.unwrap().seconds, 1_680_000_000);
}

#[tokio::test]
async fn handler_errors_reach_the_client() {
    let (base_url, _) = serve_echo(HandlerOptions::new()).await;
    let client = ProjectsServiceClient::new(
        reqwest::Client::new(),
        &base_url,
        ClientOptions::new(),
    );

    let err = client
        .get_project(
            GetProjectRequest {
                project_id: "missing".to_owned(),
            }
            .into(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::NotFound);
    assert_eq!(err.message(), "project missing not found");

    // Errors raised by tonic-based business logic keep their code.
    let err = client
        .get_project(
            GetProjectRequest {
                project_id: "gone".to_owned(),
            }
            .into(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Code::FailedPrecondition);
    let status: tonic::Status = err.into();
    assert_eq!(status.code(), tonic::Code::FailedPrecondition);
    assert_eq!(status.message(), "gone");
}

#[tokio::test]
async fn deadlines_are_enforced() {
    let (base_url, _) = serve_echo(HandlerOptions::new()).await;
    let client = ProjectsServiceClient::new(
        reqwest::Client::new(),
        &base_url,
        ClientOptions::new(),
    );

    let mut request: Request<GetProjectRequest> = GetProjectRequest {
        project_id: "slow".to_owned(),
    }
    .into();
    request.set_timeout(Duration::from_millis(50));
    let err = client.get_project(request).await.unwrap_err();
    assert_eq!(err.code(), Code::DeadlineExceeded);
}

#[tokio::test]
async fn malformed_requests_never_reach_the_handler() {
    let (base_url, calls) = serve_echo(HandlerOptions::new()).await;

    let response = reqwest::Client::new()
        .post(format!("{base_url}{CREATE_PROJECT_PROCEDURE}"))
        .header("content-type", "application/json")
        .body("{\"name\": [1, 2, 3]}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.bytes().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["code"], "invalid_argument");

    let response = reqwest::Client::new()
        .post(format!("{base_url}{CREATE_PROJECT_PROCEDURE}"))
        .header("content-type", "text/xml")
        .body("<project/>")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}
