use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use validator::Validate;

use crate::{
    auth::CurrentUser,
    error::AppError,
    models::{TaskCreateRequest, TaskUpdateRequest},
    tasks::TaskService,
};

/// Lists all tasks.
///
/// Tasks are global; authentication is optional and does not scope the
/// result.
#[get("")]
pub async fn list_tasks(service: web::Data<TaskService>) -> Result<impl Responder, AppError> {
    let tasks = service.list().await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task and responds 201 with the stored record.
#[post("")]
pub async fn create_task(
    service: web::Data<TaskService>,
    body: web::Json<TaskCreateRequest>,
    actor: CurrentUser,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let task = service.create(body.into_inner()).await?;
    if let Some(user) = &actor.0 {
        log::debug!("task {} created by {}", task.id, user.email);
    }

    Ok(HttpResponse::Created().json(task))
}

/// Fetches a single task by id.
#[get("/{id}")]
pub async fn get_task(
    service: web::Data<TaskService>,
    id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = service.get(id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Partially updates a task: provided fields overwrite, absent fields are
/// left unchanged.
#[put("/{id}")]
pub async fn update_task(
    service: web::Data<TaskService>,
    id: web::Path<i64>,
    body: web::Json<TaskUpdateRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let task = service.update(id.into_inner(), body.into_inner()).await?;

    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task permanently and responds 200 with an empty body.
#[delete("/{id}")]
pub async fn delete_task(
    service: web::Data<TaskService>,
    id: web::Path<i64>,
    actor: CurrentUser,
) -> Result<impl Responder, AppError> {
    let id = id.into_inner();
    service.delete(id).await?;
    if let Some(user) = &actor.0 {
        log::debug!("task {} deleted by {}", id, user.email);
    }

    Ok(HttpResponse::Ok().finish())
}
