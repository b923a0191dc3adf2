//! # ユーザー API ハンドラ
//!
//! ユーザーの作成・検索エンドポイントを実装する。
//!
//! ## エンドポイント
//!
//! ```text
//! POST /users
//! GET  /users/{id}
//! ```
//!
//! リクエストボディのデコード失敗はユースケースに到達する前に
//! `BadRequest` へ変換する。

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};
use meibo_domain::{AppError, user::UserId};
use meibo_infra::RequestTx;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    usecase::{NewUserDto, UserDto, UserUseCase},
};

/// ユーザーハンドラーの State
pub struct UserState<U> {
    pub usecase: U,
}

/// ユーザー作成リクエスト
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest {
    pub first_name: String,
    pub last_name:  String,
    pub age:        i32,
}

/// ユーザーレスポンス
///
/// タイムスタンプはワイヤーに載せない。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id:         String,
    pub first_name: String,
    pub last_name:  String,
    pub age:        i32,
}

impl UserResponse {
    fn from_dto(dto: UserDto) -> Self {
        Self {
            id:         dto.id.to_string(),
            first_name: dto.first_name,
            last_name:  dto.last_name,
            age:        dto.age,
        }
    }
}

/// ユーザーを作成する
///
/// ## エンドポイント
/// POST /users
pub async fn add_user<U: UserUseCase>(
    State(state): State<Arc<UserState<U>>>,
    Extension(tx): Extension<RequestTx>,
    payload: Result<Json<AddUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::bad_request(format!("リクエストボディを解釈できません: {e}"))
    })?;

    let dto = state
        .usecase
        .add_user(
            &tx,
            NewUserDto {
                first_name: payload.first_name,
                last_name:  payload.last_name,
                age:        payload.age,
            },
        )
        .await?;

    Ok(Json(UserResponse::from_dto(dto)))
}

/// ユーザーを検索する
///
/// ## エンドポイント
/// GET /users/{id}
///
/// UUID として解釈できないパスセグメントは、
/// 採番されたことのない識別子として `NotFound` で扱う。
pub async fn find_user<U: UserUseCase>(
    State(state): State<Arc<UserState<U>>>,
    Extension(tx): Extension<RequestTx>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = Uuid::parse_str(&id)
        .map(UserId::from_uuid)
        .map_err(|_| AppError::not_found(format!("ユーザーが見つかりません: {id}")))?;

    let dto = state.usecase.find_user(&tx, &id).await?;

    Ok(Json(UserResponse::from_dto(dto)))
}
