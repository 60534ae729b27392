use crate::models::*;
use utoipa::OpenApi;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health and database reachability", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Create a new room
#[utoipa::path(
    post,
    path = "/rooms",
    responses(
        (status = 200, description = "Room created with a seeded default file", body = CreateRoomResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_room_doc() {}

/// Fetch room info
#[utoipa::path(
    get,
    path = "/rooms/{room_id}",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Room info with live participant count", body = RoomInfoResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn get_room_doc() {}

/// List the files of a room
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/files",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Files in the room", body = [FileResponse])
    )
)]
#[allow(dead_code)]
pub async fn list_files_doc() {}

/// Create a file
#[utoipa::path(
    post,
    path = "/files",
    request_body = CreateFileRequest,
    responses(
        (status = 200, description = "File created", body = FileResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_file_doc() {}

/// Save a file's content
#[utoipa::path(
    put,
    path = "/files/{file_id}",
    params(("file_id" = i32, Path, description = "File id")),
    request_body = UpdateFileRequest,
    responses(
        (status = 200, description = "File saved", body = StatusResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn update_file_doc() {}

/// Delete a file
#[utoipa::path(
    delete,
    path = "/files/{file_id}",
    params(("file_id" = i32, Path, description = "File id")),
    responses(
        (status = 200, description = "File deleted", body = StatusResponse),
        (status = 404, description = "File not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn delete_file_doc() {}

/// Live participant list
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/active-users",
    params(("room_id" = String, Path, description = "Room id")),
    responses(
        (status = 200, description = "Display names currently connected, in join order", body = ActiveUsersResponse)
    )
)]
#[allow(dead_code)]
pub async fn active_users_doc() {}

/// Run a snippet on the execution service
#[utoipa::path(
    post,
    path = "/run",
    request_body = RunCodeRequest,
    responses(
        (status = 200, description = "Captured output", body = RunCodeResponse),
        (status = 503, description = "No execution runner configured", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn run_code_doc() {}

/// Run a snippet for a room and store the result
#[utoipa::path(
    post,
    path = "/rooms/{room_id}/execute",
    params(("room_id" = String, Path, description = "Room id")),
    request_body = RunCodeRequest,
    responses(
        (status = 200, description = "Captured output and stored record id", body = ExecuteResponse),
        (status = 404, description = "Room not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn execute_code_doc() {}

/// Execution history for a room
#[utoipa::path(
    get,
    path = "/rooms/{room_id}/executions",
    params(
        ("room_id" = String, Path, description = "Room id"),
        ("limit" = Option<i64>, Query, description = "Maximum records to return (default 10)")
    ),
    responses(
        (status = 200, description = "Most recent executions, newest first", body = [ExecutionRecord])
    )
)]
#[allow(dead_code)]
pub async fn list_executions_doc() {}

/// Autocomplete suggestion
#[utoipa::path(
    post,
    path = "/autocomplete",
    request_body = AutocompleteRequest,
    responses(
        (status = 200, description = "Suggestion for the cursor position (may be empty)", body = AutocompleteResponse)
    )
)]
#[allow(dead_code)]
pub async fn autocomplete_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        create_room_doc,
        get_room_doc,
        list_files_doc,
        create_file_doc,
        update_file_doc,
        delete_file_doc,
        active_users_doc,
        run_code_doc,
        execute_code_doc,
        list_executions_doc,
        autocomplete_doc,
    ),
    components(
        schemas(
            HealthResponse,
            RootResponse,
            CreateRoomResponse,
            RoomInfoResponse,
            ActiveUsersResponse,
            FileResponse,
            CreateFileRequest,
            UpdateFileRequest,
            StatusResponse,
            RunCodeRequest,
            RunCodeResponse,
            ExecuteResponse,
            ExecutionRecord,
            AutocompleteRequest,
            AutocompleteResponse,
            DiagnosticsResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "api", description = "Pair-programming API endpoints")
    )
)]
pub struct ApiDoc;
