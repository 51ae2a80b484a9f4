use utoipa::OpenApi;

use crate::error::ErrorResponse;
use crate::rest;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::landing::landing_page,
        rest::landing::new_room_page,
        rest::health::health_check,
        rest::auth::register,
        rest::auth::login,
        rest::auth::logout,
        rest::auth::me,
        rest::rooms::create_room,
        rest::rooms::list_public_rooms,
        rest::rooms::get_room,
        rest::rooms::join_room,
        rest::rooms::list_my_rooms,
        rest::members::list_members,
        rest::members::add_member,
        rest::members::remove_member,
        rest::messages::list_messages,
        rest::messages::create_message,
        rest::messages::count_messages,
        rest::messages::search_messages,
        rest::stats::my_stats,
    ),
    components(
        schemas(
            ErrorResponse,
            rest::health::HealthResponse,
            rest::auth::RegisterRequest,
            rest::auth::LoginRequest,
            rest::auth::UserResponse,
            rest::auth::SessionResponse,
            rest::rooms::CreateRoomBody,
            rest::rooms::ActionResultResponse,
            rest::rooms::RoomResponse,
            rest::rooms::PublicRoomResponse,
            rest::rooms::UserRoomResponse,
            rest::rooms::JoinRoomResponse,
            rest::members::MemberResponse,
            rest::members::AddMemberBody,
            rest::members::RemoveMemberResponse,
            rest::messages::MessageResponse,
            rest::messages::CreateMessageRequest,
            rest::messages::MessageCountResponse,
            rest::messages::SearchHitResponse,
            rest::stats::UserStatsResponse,
        )
    ),
    tags(
        (name = "Pages", description = "Server-rendered pages"),
        (name = "Health", description = "Service health"),
        (name = "Auth", description = "Accounts and bearer sessions"),
        (name = "Rooms", description = "Chat room management"),
        (name = "Members", description = "Room membership"),
        (name = "Messages", description = "Posting, paging and search"),
        (name = "Stats", description = "Per-user activity"),
    )
)]
pub struct ApiDoc;
