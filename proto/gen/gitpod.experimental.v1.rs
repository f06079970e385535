// @generated
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    /// Page size is the maximum number of results to retrieve per page.
    /// Defaults to 25.
    #[prost(int32, tag = "1")]
    pub page_size: i32,
    /// Page is the page number of results to retrieve.
    /// The first page starts at 1.
    #[prost(int32, tag = "2")]
    pub page: i32,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    /// ID is the unique identifier for the project.
    #[prost(string, tag = "1")]
    pub id: ::prost::alloc::string::String,
    /// Team ID is the Team this Project belongs to.
    /// team_id will be empty if the Project belongs to a User.
    #[prost(string, tag = "2")]
    pub team_id: ::prost::alloc::string::String,
    /// User ID is the User this Project belongs to.
    /// user_id will be empty if the Project belongs to a Team.
    #[prost(string, tag = "3")]
    pub user_id: ::prost::alloc::string::String,
    /// Name is the name of the Project.
    #[prost(string, tag = "4")]
    pub name: ::prost::alloc::string::String,
    /// Slug is a short-hand identifier for a project.
    #[prost(string, tag = "5")]
    pub slug: ::prost::alloc::string::String,
    /// Clone URL is the clone URL on which this Project is based.
    #[prost(string, tag = "6")]
    pub clone_url: ::prost::alloc::string::String,
    /// Time when the Project was created.
    #[prost(message, optional, tag = "7")]
    pub creation_time: ::core::option::Option<::pbjson_types::Timestamp>,
    /// Settings are configuration options for a Project.
    #[prost(message, optional, tag = "8")]
    pub settings: ::core::option::Option<ProjectSettings>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    #[prost(message, optional, tag = "1")]
    pub prebuild: ::core::option::Option<PrebuildSettings>,
    #[prost(message, optional, tag = "2")]
    pub workspace: ::core::option::Option<WorkspaceSettings>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrebuildSettings {
    #[prost(bool, tag = "1")]
    pub enable_incremental_prebuilds: bool,
    #[prost(bool, tag = "2")]
    pub keep_outdated_prebuilds_running: bool,
    #[prost(bool, tag = "3")]
    pub use_previous_prebuilds: bool,
    #[prost(int32, tag = "4")]
    pub prebuild_every_nth: i32,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceSettings {
    #[prost(bool, tag = "1")]
    pub enable_persistent_volume_claim: bool,
    #[prost(message, optional, tag = "2")]
    pub workspace_class: ::core::option::Option<WorkspaceClassSettings>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkspaceClassSettings {
    #[prost(string, tag = "1")]
    pub regular: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub prebuild: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProjectRequest {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub slug: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub clone_url: ::prost::alloc::string::String,
    /// Exactly one of team_id or user_id owns the new project.
    #[prost(string, tag = "4")]
    pub team_id: ::prost::alloc::string::String,
    #[prost(string, tag = "5")]
    pub user_id: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "6")]
    pub settings: ::core::option::Option<ProjectSettings>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateProjectResponse {
    #[prost(message, optional, tag = "1")]
    pub project: ::core::option::Option<Project>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetProjectRequest {
    #[prost(string, tag = "1")]
    pub project_id: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetProjectResponse {
    #[prost(message, optional, tag = "1")]
    pub project: ::core::option::Option<Project>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListProjectsRequest {
    /// User ID filters Projects owned by user_id.
    #[prost(string, tag = "1")]
    pub user_id: ::prost::alloc::string::String,
    /// Team ID filters Projects owned by team_id.
    #[prost(string, tag = "2")]
    pub team_id: ::prost::alloc::string::String,
    /// Page information
    #[prost(message, optional, tag = "3")]
    pub pagination: ::core::option::Option<Pagination>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListProjectsResponse {
    #[prost(message, repeated, tag = "1")]
    pub projects: ::prost::alloc::vec::Vec<Project>,
    #[prost(int32, tag = "2")]
    pub total_results: i32,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteProjectRequest {
    #[prost(string, tag = "1")]
    pub project_id: ::prost::alloc::string::String,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeleteProjectResponse {}
/// Connect stubs for `gitpod.experimental.v1.ProjectsService`.
pub mod projects_service_connect {
    use ::connect::codegen::*;

    /// Fully-qualified name of the service.
    pub const PROJECTS_SERVICE_NAME: &str = "gitpod.experimental.v1.ProjectsService";
    /// Path of `gitpod.experimental.v1.ProjectsService.CreateProject`.
    pub const CREATE_PROJECT_PROCEDURE: &str = "/gitpod.experimental.v1.ProjectsService/CreateProject";
    /// Path of `gitpod.experimental.v1.ProjectsService.GetProject`.
    pub const GET_PROJECT_PROCEDURE: &str = "/gitpod.experimental.v1.ProjectsService/GetProject";
    /// Path of `gitpod.experimental.v1.ProjectsService.ListProjects`.
    pub const LIST_PROJECTS_PROCEDURE: &str = "/gitpod.experimental.v1.ProjectsService/ListProjects";
    /// Path of `gitpod.experimental.v1.ProjectsService.DeleteProject`.
    pub const DELETE_PROJECT_PROCEDURE: &str = "/gitpod.experimental.v1.ProjectsService/DeleteProject";
    /// Every procedure path of the service.
    pub const PROCEDURES: &[&str] = &[
        CREATE_PROJECT_PROCEDURE,
        GET_PROJECT_PROCEDURE,
        LIST_PROJECTS_PROCEDURE,
        DELETE_PROJECT_PROCEDURE,
    ];

    #[derive(Debug, Clone)]
    pub struct ProjectsServiceClient {
        create_project: UnaryClient<super::CreateProjectRequest, super::CreateProjectResponse>,
        get_project: UnaryClient<super::GetProjectRequest, super::GetProjectResponse>,
        list_projects: UnaryClient<super::ListProjectsRequest, super::ListProjectsResponse>,
        delete_project: UnaryClient<super::DeleteProjectRequest, super::DeleteProjectResponse>,
    }

    impl ProjectsServiceClient {
        /// Binds every procedure of the service to `base_url`.
        pub fn new<C>(http_client: C, base_url: &str, options: ClientOptions) -> Self
        where
            C: HttpClient + 'static,
        {
            let http_client: Arc<dyn HttpClient> = Arc::new(http_client);
            let options = Arc::new(options);
            Self {
                create_project: UnaryClient::new(http_client.clone(), base_url, CREATE_PROJECT_PROCEDURE, options.clone()),
                get_project: UnaryClient::new(http_client.clone(), base_url, GET_PROJECT_PROCEDURE, options.clone()),
                list_projects: UnaryClient::new(http_client.clone(), base_url, LIST_PROJECTS_PROCEDURE, options.clone()),
                delete_project: UnaryClient::new(http_client.clone(), base_url, DELETE_PROJECT_PROCEDURE, options.clone()),
            }
        }

        /// Creates a new project.
        pub async fn create_project(&self, request: Request<super::CreateProjectRequest>) -> Result<Response<super::CreateProjectResponse>, ConnectError> {
            self.create_project.call_unary(request).await
        }

        /// Retrieves a project.
        pub async fn get_project(&self, request: Request<super::GetProjectRequest>) -> Result<Response<super::GetProjectResponse>, ConnectError> {
            self.get_project.call_unary(request).await
        }

        /// Lists projects.
        pub async fn list_projects(&self, request: Request<super::ListProjectsRequest>) -> Result<Response<super::ListProjectsResponse>, ConnectError> {
            self.list_projects.call_unary(request).await
        }

        /// Deletes a project.
        pub async fn delete_project(&self, request: Request<super::DeleteProjectRequest>) -> Result<Response<super::DeleteProjectResponse>, ConnectError> {
            self.delete_project.call_unary(request).await
        }
    }

    /// Server-side implementation of the `ProjectsService` service.
    #[async_trait]
    pub trait ProjectsServiceHandler: Send + Sync + 'static {
        /// Creates a new project.
        async fn create_project(&self, request: Request<super::CreateProjectRequest>) -> Result<Response<super::CreateProjectResponse>, ConnectError>;

        /// Retrieves a project.
        async fn get_project(&self, request: Request<super::GetProjectRequest>) -> Result<Response<super::GetProjectResponse>, ConnectError>;

        /// Lists projects.
        async fn list_projects(&self, request: Request<super::ListProjectsRequest>) -> Result<Response<super::ListProjectsResponse>, ConnectError>;

        /// Deletes a project.
        async fn delete_project(&self, request: Request<super::DeleteProjectRequest>) -> Result<Response<super::DeleteProjectResponse>, ConnectError>;
    }

    /// Returns the mount prefix of the service and a router with one route
    /// per procedure.
    pub fn projects_service_handler<T>(svc: T, options: HandlerOptions) -> (&'static str, Router)
    where
        T: ProjectsServiceHandler,
    {
        let svc = Arc::new(svc);
        let options = Arc::new(options);
        let router = Router::new()
            .route(CREATE_PROJECT_PROCEDURE, {
                let svc = svc.clone();
                unary_handler(
                    CREATE_PROJECT_PROCEDURE,
                    move |request: Request<super::CreateProjectRequest>| {
                        let svc = svc.clone();
                        async move { svc.create_project(request).await }
                    },
                    options.clone(),
                )
            })
            .route(GET_PROJECT_PROCEDURE, {
                let svc = svc.clone();
                unary_handler(
                    GET_PROJECT_PROCEDURE,
                    move |request: Request<super::GetProjectRequest>| {
                        let svc = svc.clone();
                        async move { svc.get_project(request).await }
                    },
                    options.clone(),
                )
            })
            .route(LIST_PROJECTS_PROCEDURE, {
                let svc = svc.clone();
                unary_handler(
                    LIST_PROJECTS_PROCEDURE,
                    move |request: Request<super::ListProjectsRequest>| {
                        let svc = svc.clone();
                        async move { svc.list_projects(request).await }
                    },
                    options.clone(),
                )
            })
            .route(DELETE_PROJECT_PROCEDURE, {
                let svc = svc.clone();
                unary_handler(
                    DELETE_PROJECT_PROCEDURE,
                    move |request: Request<super::DeleteProjectRequest>| {
                        let svc = svc.clone();
                        async move { svc.delete_project(request).await }
                    },
                    options.clone(),
                )
            });
        ("/gitpod.experimental.v1.ProjectsService/", router)
    }

    /// Answers every procedure with `Code::Unimplemented`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UnimplementedProjectsServiceHandler;

    #[async_trait]
    impl ProjectsServiceHandler for UnimplementedProjectsServiceHandler {
        async fn create_project(&self, _request: Request<super::CreateProjectRequest>) -> Result<Response<super::CreateProjectResponse>, ConnectError> {
            Err(ConnectError::new(
                Code::Unimplemented,
                "gitpod.experimental.v1.ProjectsService.CreateProject is not implemented",
            ))
        }

        async fn get_project(&self, _request: Request<super::GetProjectRequest>) -> Result<Response<super::GetProjectResponse>, ConnectError> {
            Err(ConnectError::new(
                Code::Unimplemented,
                "gitpod.experimental.v1.ProjectsService.GetProject is not implemented",
            ))
        }

        async fn list_projects(&self, _request: Request<super::ListProjectsRequest>) -> Result<Response<super::ListProjectsResponse>, ConnectError> {
            Err(ConnectError::new(
                Code::Unimplemented,
                "gitpod.experimental.v1.ProjectsService.ListProjects is not implemented",
            ))
        }

        async fn delete_project(&self, _request: Request<super::DeleteProjectRequest>) -> Result<Response<super::DeleteProjectResponse>, ConnectError> {
            Err(ConnectError::new(
                Code::Unimplemented,
                "gitpod.experimental.v1.ProjectsService.DeleteProject is not implemented",
            ))
        }
    }
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetUserStatsRequest {}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
#[derive(::serde::Serialize, ::serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetUserStatsResponse {
    #[prost(int32, tag = "1")]
    pub total_users: i32,
}
/// Connect stubs for `gitpod.experimental.v1.StatsService`.
pub mod stats_service_connect {
    use ::connect::codegen::*;

    /// Fully-qualified name of the service.
    pub const STATS_SERVICE_NAME: &str = "gitpod.experimental.v1.StatsService";
    /// Path of `gitpod.experimental.v1.StatsService.GetUserStats`.
    pub const GET_USER_STATS_PROCEDURE: &str = "/gitpod.experimental.v1.StatsService/GetUserStats";
    /// Every procedure path of the service.
    pub const PROCEDURES: &[&str] = &[
        GET_USER_STATS_PROCEDURE,
    ];

    #[derive(Debug, Clone)]
    pub struct StatsServiceClient {
        get_user_stats: UnaryClient<super::GetUserStatsRequest, super::GetUserStatsResponse>,
    }

    impl StatsServiceClient {
        /// Binds every procedure of the service to `base_url`.
        pub fn new<C>(http_client: C, base_url: &str, options: ClientOptions) -> Self
        where
            C: HttpClient + 'static,
        {
            let http_client: Arc<dyn HttpClient> = Arc::new(http_client);
            let options = Arc::new(options);
            Self {
                get_user_stats: UnaryClient::new(http_client.clone(), base_url, GET_USER_STATS_PROCEDURE, options.clone()),
            }
        }

        /// Retrieves the current user stats.
        pub async fn get_user_stats(&self, request: Request<super::GetUserStatsRequest>) -> Result<Response<super::GetUserStatsResponse>, ConnectError> {
            self.get_user_stats.call_unary(request).await
        }
    }

    /// Server-side implementation of the `StatsService` service.
    #[async_trait]
    pub trait StatsServiceHandler: Send + Sync + 'static {
        /// Retrieves the current user stats.
        async fn get_user_stats(&self, request: Request<super::GetUserStatsRequest>) -> Result<Response<super::GetUserStatsResponse>, ConnectError>;
    }

    /// Returns the mount prefix of the service and a router with one route
    /// per procedure.
    pub fn stats_service_handler<T>(svc: T, options: HandlerOptions) -> (&'static str, Router)
    where
        T: StatsServiceHandler,
    {
        let svc = Arc::new(svc);
        let options = Arc::new(options);
        let router = Router::new()
            .route(GET_USER_STATS_PROCEDURE, {
                let svc = svc.clone();
                unary_handler(
                    GET_USER_STATS_PROCEDURE,
                    move |request: Request<super::GetUserStatsRequest>| {
                        let svc = svc.clone();
                        async move { svc.get_user_stats(request).await }
                    },
                    options.clone(),
                )
            });
        ("/gitpod.experimental.v1.StatsService/", router)
    }

    /// Answers every procedure with `Code::Unimplemented`.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct UnimplementedStatsServiceHandler;

    #[async_trait]
    impl StatsServiceHandler for UnimplementedStatsServiceHandler {
        async fn get_user_stats(&self, _request: Request<super::GetUserStatsRequest>) -> Result<Response<super::GetUserStatsResponse>, ConnectError> {
            Err(ConnectError::new(
                Code::Unimplemented,
                "gitpod.experimental.v1.StatsService.GetUserStats is not implemented",
            ))
        }
    }
}
