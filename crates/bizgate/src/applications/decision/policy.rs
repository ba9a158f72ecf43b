use super::super::domain::{
    ApplicationSpec, DecisionKind, EligibilityStatus, EvaluationResult, ReasonCode, SpecKind,
    StatusHint, SubmitChannel,
};

/// One step of the decision state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    SubmitChannel,
    BlockingStatus,
    Consent,
    MissingData,
    Eligibility,
}

const BENEFIT_ORDER: [Guard; 5] = [
    Guard::SubmitChannel,
    Guard::BlockingStatus,
    Guard::Consent,
    Guard::MissingData,
    Guard::Eligibility,
];

// Tax flow asks for consent and missing data before looking at the service status.
const TAX_ORDER: [Guard; 5] = [
    Guard::SubmitChannel,
    Guard::Consent,
    Guard::MissingData,
    Guard::BlockingStatus,
    Guard::Eligibility,
];

pub fn guard_order(kind: SpecKind) -> &'static [Guard] {
    match kind {
        SpecKind::Benefit => &BENEFIT_ORDER,
        SpecKind::Tax => &TAX_ORDER,
    }
}

impl Guard {
    pub(crate) fn check(
        self,
        spec: &ApplicationSpec,
        evaluation: &EvaluationResult,
        consent: bool,
    ) -> Option<(DecisionKind, ReasonCode)> {
        match self {
            Guard::SubmitChannel => (spec.submit_channel == SubmitChannel::ManualLink)
                .then_some((DecisionKind::ManualOnly, ReasonCode::ManualLinkOnly)),
            Guard::BlockingStatus => blocking_status(spec),
            Guard::Consent => {
                (!consent).then_some((DecisionKind::SendSms, ReasonCode::ConsentMissing))
            }
            Guard::MissingData => evaluation
                .has_missing_data()
                .then_some((DecisionKind::SendSms, ReasonCode::RequiredDataMissing)),
            Guard::Eligibility => (evaluation.eligibility != EligibilityStatus::Eligible)
                .then_some((DecisionKind::ManualOnly, ReasonCode::EligibilityUnconfirmed)),
        }
    }
}

/// An inactive service can only be handled by a person; a signature requirement means the
/// applicant has to act, so they are asked by SMS.
fn blocking_status(spec: &ApplicationSpec) -> Option<(DecisionKind, ReasonCode)> {
    if spec.status_hint == StatusHint::Inactive {
        return Some((DecisionKind::ManualOnly, ReasonCode::ServiceInactive));
    }
    if spec.requires_digital_signature {
        return Some((DecisionKind::SendSms, ReasonCode::DigitalSignatureRequired));
    }
    None
}
