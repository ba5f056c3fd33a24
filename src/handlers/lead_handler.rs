use actix_multipart::Multipart;
use actix_web::guard::GuardContext;
use actix_web::http::header;
use actix_web::{get, post, routes, web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::CrmError;
use crate::models::lead_model::{LeadPatch, NewLead};
use crate::services::leads;
use crate::upload_handlers::rest::read_lead_form;
use crate::utils::auth::AuthUser;

fn is_json(ctx: &GuardContext) -> bool {
    ctx.head()
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("application/json"))
        .unwrap_or(false)
}

#[get("/leads")]
pub async fn get_leads(state: web::Data<AppState>, user: AuthUser) -> HttpResponse {
    let doc = state.store.load().await;
    HttpResponse::Ok().json(leads::visible_leads(&doc, &user))
}

#[post("/leads", guard = "is_json")]
pub async fn create_lead_json(
    state: web::Data<AppState>,
    _user: AuthUser,
    body: web::Json<NewLead>,
) -> Result<HttpResponse, CrmError> {
    create(&state, body.into_inner(), None).await
}

/// Multipart intake with an optional `visitingCard` image.
#[post("/leads")]
pub async fn create_lead_form(
    state: web::Data<AppState>,
    _user: AuthUser,
    payload: Multipart,
) -> Result<HttpResponse, CrmError> {
    let (input, photo_url) = read_lead_form(payload, &state.uploads).await?;
    create(&state, input, photo_url).await
}

async fn create(
    state: &AppState,
    input: NewLead,
    photo_url: Option<String>,
) -> Result<HttpResponse, CrmError> {
    let strategy = state.strategy.as_ref();
    let stored_photo = photo_url.clone();

    let result = state
        .store
        .update(|doc| {
            let lead = leads::create_lead(doc, input, photo_url, strategy, Utc::now())?;
            Ok(leads::hydrate(lead, &doc.users))
        })
        .await;

    match result {
        Ok(lead) => Ok(HttpResponse::Created().json(lead)),
        Err(e) => {
            if let Some(url) = &stored_photo {
                state.uploads.discard(url);
            }
            Err(e)
        }
    }
}

/// Status/notes patch. Both route shapes have been used by clients.
#[routes]
#[put("/leads/{id}")]
#[put("/leads/{id}/status")]
pub async fn update_lead(
    state: web::Data<AppState>,
    user: AuthUser,
    path: web::Path<Uuid>,
    body: web::Json<LeadPatch>,
) -> Result<HttpResponse, CrmError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    let policy = state.config.status_policy;

    let lead = state
        .store
        .update(|doc| leads::update_lead(doc, id, patch, &user, policy))
        .await?;
    Ok(HttpResponse::Ok().json(lead))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lead_model::{HydratedLead, Lead};
    use crate::test_support::{fixture, multipart_body, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::json;

    #[actix_web::test]
    async fn test_create_json_lead_assigns_zone() {
        let fx = fixture().await;
        let app = test_app!(fx);

        let req = test::TestRequest::post()
            .uri("/api/leads")
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.admin)))
            .set_json(json!({
                "senderEmail": "a@b.com",
                "senderMobile": "9990001111",
                "zone": "Zone A"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let lead: HydratedLead = test::read_body_json(resp).await;
        assert_eq!(lead.lead.assigned_to, Some(fx.sales_a.id));
        assert_eq!(lead.lead.status, "New");
        assert_eq!(lead.assigned_to_name, "Salesman A");
    }

    #[actix_web::test]
    async fn test_duplicate_lead_rejected() {
        let fx = fixture().await;
        let app = test_app!(fx);

        for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
            let req = test::TestRequest::post()
                .uri("/api/leads")
                .insert_header((header::AUTHORIZATION, fx.bearer(&fx.sales_b)))
                .set_json(json!({ "senderEmail": "a@b.com", "zone": "Zone B" }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), expected);
        }

        assert_eq!(fx.state.store.load().await.leads.len(), 1);
    }

    #[actix_web::test]
    async fn test_create_requires_token() {
        let fx = fixture().await;
        let app = test_app!(fx);

        let req = test::TestRequest::post()
            .uri("/api/leads")
            .set_json(json!({ "senderEmail": "a@b.com" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(fx.state.store.load().await.leads.is_empty());
    }

    #[actix_web::test]
    async fn test_create_multipart_with_image() {
        let fx = fixture().await;
        let app = test_app!(fx);

        let (content_type, body) = multipart_body(
            &[
                ("senderName", "Priya Patel"),
                ("senderMobile", "9812345678"),
                ("zone", "Zone B"),
                ("queryProductName", "Solar Panel"),
            ],
            Some(("visitingCard", "card.png", &b"\x89PNG-bytes"[..])),
        );
        let req = test::TestRequest::post()
            .uri("/api/leads")
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.admin)))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let lead: HydratedLead = test::read_body_json(resp).await;
        assert_eq!(lead.lead.assigned_to, Some(fx.sales_b.id));
        assert_eq!(lead.lead.query_product_name, "Solar Panel");
        assert!(lead.lead.photo_url.starts_with("/uploads/"));
        assert!(lead.lead.photo_url.ends_with("-card.png"));

        let req = test::TestRequest::get().uri(&lead.lead.photo_url).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let served = test::read_body(resp).await;
        assert_eq!(&served[..], b"\x89PNG-bytes");
    }

    #[actix_web::test]
    async fn test_duplicate_multipart_discards_image() {
        let fx = fixture().await;
        fx.state
            .store
            .update(|doc| {
                doc.leads.push(Lead {
                    id: Uuid::new_v4(),
                    sender_mobile: "9812345678".into(),
                    ..Default::default()
                });
                Ok(())
            })
            .await
            .unwrap();
        let app = test_app!(fx);

        let (content_type, body) = multipart_body(
            &[("senderMobile", "9812345678")],
            Some(("visitingCard", "card.png", &b"bytes"[..])),
        );
        let req = test::TestRequest::post()
            .uri("/api/leads")
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.admin)))
            .insert_header((header::CONTENT_TYPE, content_type))
            .set_payload(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let files = std::fs::read_dir(fx.state.uploads.base_path()).unwrap().count();
        assert_eq!(files, 0);
    }

    async fn seeded_lead(fx: &crate::test_support::Fixture) -> Uuid {
        let owner = fx.sales_a.id;
        fx.state
            .store
            .update(|doc| {
                let lead = Lead {
                    id: Uuid::new_v4(),
                    sender_email: "a@b.com".into(),
                    zone: "Zone A".into(),
                    assigned_to: Some(owner),
                    status: "New".into(),
                    ..Default::default()
                };
                let id = lead.id;
                doc.leads.push(lead);
                Ok(id)
            })
            .await
            .unwrap()
    }

    #[actix_web::test]
    async fn test_list_is_scoped_by_role() {
        let fx = fixture().await;
        seeded_lead(&fx).await;
        let app = test_app!(fx);

        for (user, expected) in [(&fx.admin, 1), (&fx.sales_a, 1), (&fx.sales_b, 0)] {
            let req = test::TestRequest::get()
                .uri("/api/leads")
                .insert_header((header::AUTHORIZATION, fx.bearer(user)))
                .to_request();
            let leads: Vec<HydratedLead> = test::call_and_read_body_json(&app, req).await;
            assert_eq!(leads.len(), expected);
        }
    }

    #[actix_web::test]
    async fn test_update_both_route_shapes() {
        let fx = fixture().await;
        let id = seeded_lead(&fx).await;
        let app = test_app!(fx);

        let req = test::TestRequest::put()
            .uri(&format!("/api/leads/{}/status", id))
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.sales_a)))
            .set_json(json!({ "status": "Contacted" }))
            .to_request();
        let lead: Lead = test::call_and_read_body_json(&app, req).await;
        assert_eq!(lead.status, "Contacted");

        let req = test::TestRequest::put()
            .uri(&format!("/api/leads/{}", id))
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.admin)))
            .set_json(json!({ "notes": "Send quote on Monday" }))
            .to_request();
        let lead: Lead = test::call_and_read_body_json(&app, req).await;
        assert_eq!(lead.status, "Contacted");
        assert_eq!(lead.notes.as_deref(), Some("Send quote on Monday"));

        let req = test::TestRequest::put()
            .uri(&format!("/api/leads/{}", id))
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.sales_a)))
            .set_json(json!({ "notes": null }))
            .to_request();
        let lead: Lead = test::call_and_read_body_json(&app, req).await;
        assert_eq!(lead.notes, None);
        assert_eq!(fx.state.store.load().await.leads[0].notes, None);
    }

    #[actix_web::test]
    async fn test_update_by_other_salesman_forbidden() {
        let fx = fixture().await;
        let id = seeded_lead(&fx).await;
        let app = test_app!(fx);

        let req = test::TestRequest::put()
            .uri(&format!("/api/leads/{}", id))
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.sales_b)))
            .set_json(json!({ "status": "Lost", "notes": "x" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let doc = fx.state.store.load().await;
        assert_eq!(doc.leads[0].status, "New");
        assert_eq!(doc.leads[0].notes, None);
    }

    #[actix_web::test]
    async fn test_update_unknown_lead() {
        let fx = fixture().await;
        let app = test_app!(fx);

        let req = test::TestRequest::put()
            .uri(&format!("/api/leads/{}", Uuid::new_v4()))
            .insert_header((header::AUTHORIZATION, fx.bearer(&fx.admin)))
            .set_json(json!({ "status": "Lost" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
