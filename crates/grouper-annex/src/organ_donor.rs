//! Annex 16: identification of a deceased organ donor.

use grouper_model::ServiceCode;
use grouper_standards::ORGAN_DONOR_SERVICE;
use grouper_standards::rulebook::OrganDonorLists;

use crate::matching::any_in;

/// Coma, brain edema and a selected brain disease must all be reported.
pub fn evaluate(lists: &OrganDonorLists, diagnoses: &[String]) -> Vec<ServiceCode> {
    let all_present = [&lists.coma, &lists.brain_edema, &lists.selected_diseases]
        .into_iter()
        .all(|list| any_in(diagnoses, list));
    if all_present {
        vec![ServiceCode::new(ORGAN_DONOR_SERVICE)]
    } else {
        Vec::new()
    }
}
