mod create_user;
mod get_users;
mod update_user;
mod user_groups;

pub use create_user::{CreateUser, CreateUserHandler, CreateUserResponse, UserValues};
pub use get_users::{GetUsers, GetUsersHandler, GetUsersResponse};
pub use update_user::{UpdateUser, UpdateUserHandler, UpdateUserResponse, UserUpdateValues};
pub use user_groups::{
    CreateUserGroup, CreateUserGroupHandler, CreateUserGroupResponse, DeleteUserGroup,
    DeleteUserGroupHandler, DeleteUserGroupResponse, GetUserGroups, GetUserGroupsHandler,
    GetUserGroupsResponse, UpdateUserGroup, UpdateUserGroupHandler, UpdateUserGroupResponse,
    UserGroupValues,
};
