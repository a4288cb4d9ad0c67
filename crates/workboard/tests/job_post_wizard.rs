//! End-to-end scenarios for the job-post wizard: step gating, drafts and publishing through
//! the public service facade and HTTP router.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use workboard::marketplace::domain::{GateAnswer, PayType};
    use workboard::marketplace::posting::{
        JobPost, JobPostFormData, JobPostId, JobPostService, JobPostStatus, JobPostStore,
        PostingRules,
    };
    use workboard::marketplace::store::RepositoryError;

    #[derive(Default)]
    pub(super) struct MemoryStore {
        posts: Mutex<HashMap<JobPostId, JobPost>>,
    }

    impl JobPostStore for MemoryStore {
        fn insert(&self, post: JobPost) -> Result<JobPost, RepositoryError> {
            let mut guard = self.posts.lock().expect("store mutex poisoned");
            if guard.contains_key(&post.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(post.id.clone(), post.clone());
            Ok(post)
        }

        fn update(&self, post: JobPost) -> Result<(), RepositoryError> {
            self.posts
                .lock()
                .expect("store mutex poisoned")
                .insert(post.id.clone(), post);
            Ok(())
        }

        fn fetch(&self, id: &JobPostId) -> Result<Option<JobPost>, RepositoryError> {
            Ok(self
                .posts
                .lock()
                .expect("store mutex poisoned")
                .get(id)
                .cloned())
        }

        fn list(&self, status: JobPostStatus) -> Result<Vec<JobPost>, RepositoryError> {
            Ok(self
                .posts
                .lock()
                .expect("store mutex poisoned")
                .values()
                .filter(|post| post.status == status)
                .cloned()
                .collect())
        }
    }

    pub(super) fn service(rules: PostingRules) -> (JobPostService<MemoryStore>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        (JobPostService::new(store.clone(), rules), store)
    }

    pub(super) fn basics(form: &mut JobPostFormData) {
        form.title = "Commercial painter".to_string();
        form.category = "Painting".to_string();
        form.description = "Repaint corridors and stairwells in an occupied office tower."
            .to_string();
        form.location = "Des Moines, IA".to_string();
        form.pay_type = Some(PayType::Hourly);
        form.pay_min = Some(22.0);
        form.pay_max = Some(27.5);
    }

    pub(super) fn complete_form() -> JobPostFormData {
        let mut form = JobPostFormData::default();
        basics(&mut form);
        form.add_skill("Spray painting");
        form.add_language("English");
        form.requires_background_check = Some(GateAnswer::NotRequired);
        form.requires_intro_video = Some(GateAnswer::NotRequired);
        form.requires_references = Some(GateAnswer::Required);
        form
    }
}

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;
use workboard::marketplace::domain::GateAnswer;
use workboard::marketplace::posting::{
    job_post_router, GateRule, JobPostFormData, JobPostServiceError, JobPostStatus, JobPostStore,
    PostingRules,
};
use workboard::marketplace::store::RepositoryError;
use workboard::marketplace::wizard::{Advance, StepWizard, WizardError, WizardForm};

use common::*;

#[test]
fn wizard_walks_all_steps_and_publishes() {
    let rules = PostingRules::default();
    let (service, _) = service(rules);
    let mut wizard = StepWizard::new(JobPostFormData::default(), rules);

    match wizard.advance() {
        Advance::Blocked { errors } => {
            for field in ["title", "category", "description", "location", "payType", "payMin", "payMax"] {
                assert!(errors.contains(field), "missing error for {field}");
            }
        }
        other => panic!("expected blocked advance, got {other:?}"),
    }
    assert_eq!(wizard.step(), 1);

    basics(wizard.form_mut());
    assert_eq!(wizard.advance(), Advance::Moved { to: 2 });

    assert!(matches!(wizard.advance(), Advance::Blocked { .. }));
    wizard.form_mut().add_skill("Spray painting");
    assert_eq!(wizard.advance(), Advance::Moved { to: 3 });

    wizard.form_mut().set_no_language_requirement(true);
    wizard.form_mut().requires_background_check = Some(GateAnswer::Required);
    wizard.form_mut().requires_intro_video = Some(GateAnswer::NotRequired);
    match wizard.advance() {
        Advance::Blocked { errors } => {
            assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["requiresReferences"]);
        }
        other => panic!("expected references gate error, got {other:?}"),
    }
    wizard.form_mut().requires_references = Some(GateAnswer::NotRequired);
    assert_eq!(wizard.advance(), Advance::Moved { to: 4 });
    assert_eq!(wizard.advance(), Advance::AtFinalStep);

    let form = wizard.begin_submit().expect("all steps valid");
    assert!(wizard.is_submitting());
    assert_eq!(wizard.begin_submit(), Err(WizardError::SubmissionInFlight));

    let result = service.publish("employer-3", form);
    wizard.finish_submit(&result).expect("submission in flight");
    let post = result.expect("publishes");
    assert_eq!(post.status, JobPostStatus::Published);
    assert!(!wizard.is_submitting());
}

#[test]
fn submit_returns_to_first_failing_step() {
    let rules = PostingRules::default();
    let mut wizard = StepWizard::new(complete_form(), rules);
    for _ in 1..JobPostFormData::STEPS {
        wizard.advance();
    }
    assert!(wizard.is_final_step());

    wizard.form_mut().required_skills.clear();
    match wizard.begin_submit() {
        Err(WizardError::Incomplete { step, errors }) => {
            assert_eq!(step, 2);
            assert!(errors.contains("requiredSkills"));
        }
        other => panic!("expected incomplete error, got {other:?}"),
    }
    assert_eq!(wizard.step(), 2);
    assert!(!wizard.is_submitting());
}

#[test]
fn back_and_go_to_never_validate() {
    let rules = PostingRules::default();
    let mut wizard = StepWizard::new(complete_form(), rules);
    wizard.advance();
    wizard.advance();
    assert_eq!(wizard.step(), 3);

    wizard.form_mut().title.clear();
    assert_eq!(wizard.back(), 2);
    assert_eq!(wizard.go_to(1), Ok(1));
    assert_eq!(wizard.back(), 1);
    assert!(matches!(
        wizard.go_to(3),
        Err(WizardError::ForwardJump { current: 1, requested: 3 })
    ));
}

#[test]
fn failed_publish_keeps_record_for_retry() {
    let rules = PostingRules::default();
    let mut wizard = StepWizard::new(complete_form(), rules);
    for _ in 1..JobPostFormData::STEPS {
        wizard.advance();
    }
    let form = wizard.begin_submit().expect("valid");

    let failure: Result<(), JobPostServiceError> = Err(JobPostServiceError::Repository(
        RepositoryError::Unavailable("backend down".to_string()),
    ));
    wizard.finish_submit(&failure).expect("in flight");

    let notice = wizard.notice().expect("notice recorded");
    assert!(notice.message.contains("backend down"));
    assert_eq!(wizard.form(), &form);
    assert!(wizard.begin_submit().is_ok(), "retry is allowed");
}

#[test]
fn affirmative_gate_rule_rejects_explicit_no() {
    let (service, store) = service(PostingRules {
        gate_rule: GateRule::Affirmative,
    });

    match service.publish("employer-3", complete_form()) {
        Err(JobPostServiceError::Incomplete { step, errors }) => {
            assert_eq!(step, 3);
            assert!(errors.contains("requiresBackgroundCheck"));
            assert!(errors.contains("requiresIntroVideo"));
            assert!(!errors.contains("requiresReferences"));
        }
        other => panic!("expected gate errors, got {other:?}"),
    }
    assert!(store.list(JobPostStatus::Published).expect("lists").is_empty());
}

#[test]
fn drafts_publish_once_complete() {
    let (service, _) = service(PostingRules::default());
    let mut partial = JobPostFormData::default();
    partial.title = "Commercial painter".to_string();

    let draft = service
        .save_draft("employer-3", None, partial)
        .expect("draft saves");
    assert_eq!(draft.status, JobPostStatus::Draft);
    assert!(matches!(
        service.publish_draft(&draft.id),
        Err(JobPostServiceError::Incomplete { step: 1, .. })
    ));

    service
        .save_draft("employer-3", Some(&draft.id), complete_form())
        .expect("draft updates");
    let published = service.publish_draft(&draft.id).expect("publishes");
    assert_eq!(published.id, draft.id);
    assert!(matches!(
        service.publish_draft(&draft.id),
        Err(JobPostServiceError::AlreadyPublished(_))
    ));
}

#[tokio::test]
async fn router_publishes_with_flag_winning_over_languages() {
    let (service, _) = service(PostingRules::default());
    let mut form = serde_json::to_value(complete_form()).expect("serializes");
    form["noLanguageRequirement"] = json!(true);
    form["requiresBackgroundCheck"] = json!(false);

    let response = job_post_router(Arc::new(service))
        .oneshot(
            Request::post("/api/v1/job-posts")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "employerId": "employer-3", "form": form }).to_string(),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: serde_json::Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["form"]["languageRequirements"], json!([]));
    assert_eq!(payload["form"]["requiresBackgroundCheck"], json!("not_required"));
}
