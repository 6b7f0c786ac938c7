//! # 会员管理处理器

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use entity::{members, members::Entity as Members, packages::Entity as Packages};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::error::ConsoleError;
use crate::management::response;
use crate::management::server::AppState;
use crate::management::services::shared::{
    PaginationParams, build_page, validate_email_format, validate_name_format,
};

/// 会员查询参数
#[derive(Debug, Deserialize)]
pub struct MemberQuery {
    /// 页码
    pub page: Option<u64>,
    /// 每页大小
    pub limit: Option<u64>,
    /// 状态过滤
    pub status: Option<String>,
    /// 套餐过滤
    pub package_id: Option<i32>,
    /// 姓名/邮箱模糊搜索
    pub search: Option<String>,
}

/// 创建会员请求
#[derive(Debug, Deserialize)]
pub struct CreateMemberRequest {
    /// 姓名
    pub name: String,
    /// 邮箱
    pub email: String,
    /// 电话
    pub phone: Option<String>,
    /// 会籍套餐
    pub package_id: Option<i32>,
}

/// 更新会员请求
#[derive(Debug, Deserialize)]
pub struct UpdateMemberRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub package_id: Option<i32>,
    /// "active" / "inactive"
    pub status: Option<String>,
}

/// 会员响应
#[derive(Debug, Serialize)]
pub struct MemberResponse {
    /// 会员ID
    pub id: i32,
    /// 姓名
    pub name: String,
    /// 邮箱
    pub email: String,
    /// 电话
    pub phone: Option<String>,
    /// 会籍套餐
    pub package_id: Option<i32>,
    /// 入会时间
    pub joined_at: chrono::DateTime<chrono::Utc>,
    /// 状态
    pub status: String,
    /// 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<members::Model> for MemberResponse {
    fn from(member: members::Model) -> Self {
        Self {
            id: member.id,
            name: member.name,
            email: member.email,
            phone: member.phone,
            package_id: member.package_id,
            joined_at: member.joined_at.and_utc(),
            status: if member.is_active {
                "active".to_string()
            } else {
                "inactive".to_string()
            },
            created_at: member.created_at.and_utc(),
            updated_at: member.updated_at.and_utc(),
        }
    }
}

/// 应用查询过滤条件
fn apply_filters(mut select: Select<Members>, query: &MemberQuery) -> Select<Members> {
    if let Some(status) = &query.status {
        match status.as_str() {
            "active" => select = select.filter(members::Column::IsActive.eq(true)),
            "inactive" => select = select.filter(members::Column::IsActive.eq(false)),
            _ => {}
        }
    }

    if let Some(package_id) = query.package_id {
        select = select.filter(members::Column::PackageId.eq(package_id));
    }

    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        select = select.filter(
            Condition::any()
                .add(members::Column::Name.contains(search))
                .add(members::Column::Email.contains(search)),
        );
    }

    select
}

/// 列出会员
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<MemberQuery>,
) -> Response {
    let params = PaginationParams::new(query.page, query.limit, 20, 100);

    let select = apply_filters(Members::find(), &query);

    let members_result = select
        .clone()
        .offset(params.offset())
        .limit(params.limit)
        .order_by_asc(members::Column::Id)
        .all(state.database.as_ref())
        .await;

    let members_list = match members_result {
        Ok(list) => list,
        Err(err) => {
            tracing::error!("Failed to fetch members: {err}");
            return response::app_error(err.into());
        }
    };

    // 获取总数
    let total = match select.count(state.database.as_ref()).await {
        Ok(count) => count,
        Err(err) => {
            tracing::error!("Failed to count members: {err}");
            return response::app_error(err.into());
        }
    };

    let data: Vec<MemberResponse> = members_list.into_iter().map(MemberResponse::from).collect();

    response::paginated(data, build_page(total, params).into())
}

/// 创建会员
pub async fn create_member(
    State(state): State<AppState>,
    axum::Json(request): axum::Json<CreateMemberRequest>,
) -> Response {
    // 验证输入
    if let Err(err) = validate_name_format(&request.name) {
        return response::app_error(err);
    }
    if let Err(err) = validate_email_format(&request.email) {
        return response::app_error(err);
    }

    // 校验套餐存在
    if let Some(package_id) = request.package_id {
        match Packages::find_by_id(package_id)
            .one(state.database.as_ref())
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                return response::app_error(ConsoleError::validation(format!(
                    "套餐不存在: {package_id}"
                )));
            }
            Err(err) => {
                tracing::error!("Failed to check package {package_id}: {err}");
                return response::app_error(err.into());
            }
        }
    }

    // 检查邮箱是否已被占用
    match Members::find()
        .filter(members::Column::Email.eq(request.email.trim()))
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(_)) => {
            return response::app_error(ConsoleError::conflict("邮箱已被其它会员使用"));
        }
        Ok(None) => {}
        Err(err) => {
            tracing::error!("Failed to check existing member: {err}");
            return response::app_error(err.into());
        }
    }

    let now = Utc::now().naive_utc();
    let member = members::ActiveModel {
        name: Set(request.name.trim().to_string()),
        email: Set(request.email.trim().to_string()),
        phone: Set(request.phone),
        package_id: Set(request.package_id),
        joined_at: Set(now),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    match member.insert(state.database.as_ref()).await {
        Ok(created) => response::success_with_message(MemberResponse::from(created), "创建成功"),
        Err(err) => {
            tracing::error!("Failed to create member: {err}");
            response::app_error(err.into())
        }
    }
}

/// 获取单个会员
pub async fn get_member(State(state): State<AppState>, Path(member_id): Path<i32>) -> Response {
    match Members::find_by_id(member_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(member)) => response::success(MemberResponse::from(member)),
        Ok(None) => {
            response::app_error(ConsoleError::not_found(format!("会员不存在: {member_id}")))
        }
        Err(err) => {
            tracing::error!("Failed to fetch member {member_id}: {err}");
            response::app_error(err.into())
        }
    }
}

/// 更新会员
pub async fn update_member(
    State(state): State<AppState>,
    Path(member_id): Path<i32>,
    axum::Json(request): axum::Json<UpdateMemberRequest>,
) -> Response {
    let member = match Members::find_by_id(member_id)
        .one(state.database.as_ref())
        .await
    {
        Ok(Some(member)) => member,
        Ok(None) => {
            return response::app_error(ConsoleError::not_found(format!(
                "会员不存在: {member_id}"
            )));
        }
        Err(err) => {
            tracing::error!("Failed to fetch member for update: {err}");
            return response::app_error(err.into());
        }
    };

    if let Some(name) = &request.name
        && let Err(err) = validate_name_format(name)
    {
        return response::app_error(err);
    }

    // 邮箱变更时检查唯一性
    if let Some(email) = &request.email {
        if let Err(err) = validate_email_format(email) {
            return response::app_error(err);
        }
        match Members::find()
            .filter(members::Column::Email.eq(email.trim()))
            .filter(members::Column::Id.ne(member_id))
            .one(state.database.as_ref())
            .await
        {
            Ok(Some(_)) => {
                return response::app_error(ConsoleError::conflict("邮箱已被其它会员使用"));
            }
            Ok(None) => {}
            Err(err) => {
                tracing::error!("Failed to check email uniqueness: {err}");
                return response::app_error(err.into());
            }
        }
    }

    if let Some(package_id) = request.package_id {
        match Packages::find_by_id(package_id)
            .one(state.database.as_ref())
            .await
        {
            Ok(Some(_)) => {}
            Ok(None) => {
                return response::app_error(ConsoleError::validation(format!(
                    "套餐不存在: {package_id}"
                )));
            }
            Err(err) => {
                tracing::error!("Failed to check package {package_id}: {err}");
                return response::app_error(err.into());
            }
        }
    }

    let mut active_model: members::ActiveModel = member.into();
    if let Some(name) = request.name {
        active_model.name = Set(name.trim().to_string());
    }
    if let Some(email) = request.email {
        active_model.email = Set(email.trim().to_string());
    }
    if let Some(phone) = request.phone {
        active_model.phone = Set(Some(phone));
    }
    if let Some(package_id) = request.package_id {
        active_model.package_id = Set(Some(package_id));
    }
    if let Some(status) = request.status {
        match status.as_str() {
            "active" => active_model.is_active = Set(true),
            "inactive" => active_model.is_active = Set(false),
            _ => {
                return response::app_error(ConsoleError::validation(format!(
                    "无效的状态: {status}"
                )));
            }
        }
    }
    active_model.updated_at = Set(Utc::now().naive_utc());

    match active_model.update(state.database.as_ref()).await {
        Ok(updated) => response::success_with_message(MemberResponse::from(updated), "更新成功"),
        Err(err) => {
            tracing::error!("Failed to update member {member_id}: {err}");
            response::app_error(err.into())
        }
    }
}

/// 删除会员
pub async fn delete_member(State(state): State<AppState>, Path(member_id): Path<i32>) -> Response {
    match Members::delete_by_id(member_id)
        .exec(state.database.as_ref())
        .await
    {
        Ok(result) if result.rows_affected == 0 => {
            response::app_error(ConsoleError::not_found(format!("会员不存在: {member_id}")))
        }
        Ok(_) => response::success_without_data("删除成功"),
        Err(err) => {
            tracing::error!("Failed to delete member {member_id}: {err}");
            response::app_error(err.into())
        }
    }
}
