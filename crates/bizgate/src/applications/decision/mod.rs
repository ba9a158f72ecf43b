mod payload;
mod policy;

pub use payload::build_payload;
pub use policy::{guard_order, Guard};

use super::domain::{
    ApplicationSpec, Decision, DecisionKind, EvaluationResult, ReasonCode, StatusHint, UserProfile,
};
use super::evaluation::EligibilityEvaluator;
use super::notify::{compose_sms, NotificationContext, SmsStyle};

/// Walk the guards for the spec's kind; the first one that fires decides.
///
/// Pure: the outcome depends only on the arguments.
pub fn route(
    spec: &ApplicationSpec,
    profile: &UserProfile,
    evaluation: EvaluationResult,
    consent: bool,
) -> Decision {
    let (kind, reason) = guard_order(spec.kind)
        .iter()
        .find_map(|guard| guard.check(spec, &evaluation, consent))
        .unwrap_or((DecisionKind::AutoSubmit, ReasonCode::ReadyForSubmission));

    let mut warnings = Vec::new();
    if spec.status_hint == StatusHint::Unclear {
        warnings.push("service status is unclear; confirm it is accepting applications".to_string());
    }
    if spec.requires_digital_signature && reason != ReasonCode::DigitalSignatureRequired {
        warnings.push("submission requires a digital signature (ERI)".to_string());
    }

    Decision {
        application_id: spec.id.clone(),
        kind,
        reason,
        reason_message: reason.message().to_string(),
        warnings,
        payload: build_payload(spec, profile),
        evaluation,
        sms: None,
    }
}

/// Evaluates a profile and routes the application, composing an SMS for non-automatic outcomes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionRouter {
    evaluator: EligibilityEvaluator,
}

impl DecisionRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn decide(
        &self,
        spec: &ApplicationSpec,
        profile: &UserProfile,
        consent: bool,
        completion_url: &str,
    ) -> Decision {
        let evaluation = self.evaluator.evaluate(spec, profile);
        let mut decision = route(spec, profile, evaluation, consent);

        if decision.kind != DecisionKind::AutoSubmit {
            let context = NotificationContext::new(spec, &decision.evaluation);
            decision.sms = Some(compose_sms(
                &context,
                completion_url,
                SmsStyle::for_kind(spec.kind),
            ));
        }

        decision
    }
}
