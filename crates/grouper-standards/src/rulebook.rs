//! Typed view of the annex tables.
//!
//! Compiling the rule book parses criterion names, expands code ranges,
//! indexes secondary-procedure groups and resolves diagnosis groups that are
//! defined by reference to another annex. Anything inconsistent fails here,
//! before the first case is grouped.

use std::collections::{BTreeMap, BTreeSet};

use grouper_model::{
    AgeBand, DiagnosisScope, DrgDiagnosisCriterion, NewbornCriterion, ServiceCode,
    normalize_code_list,
};
use tracing::debug;

use crate::codes::expand_code_list;
use crate::csv_utils::{TableRow, get_field, get_optional};
use crate::error::StandardsError;
use crate::schema;
use crate::store::{ReferenceStore, ReferenceTable};

/// Service assigned by the organ-donor rule.
pub const ORGAN_DONOR_SERVICE: &str = "S17-22";

/// Optional column carrying the service name in the principal-diagnosis
/// tables; consulted when resolving diagnosis groups by service name.
const SERVICE_NAME_COLUMN: &str = "nazov_ms";

/// Normalized prefix of a diagnosis-group row defined through another annex.
const RELATIONSHIP_PREFIX: &str = "vz";

/// A pair of rule sets, one per age band.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgeBanded<T> {
    pub child: T,
    pub adult: T,
}

impl<T> AgeBanded<T> {
    pub fn get(&self, band: AgeBand) -> &T {
        match band {
            AgeBand::Child => &self.child,
            AgeBand::Adult => &self.adult,
        }
    }

    fn try_build<E>(mut build: impl FnMut(AgeBand) -> Result<T, E>) -> Result<Self, E> {
        Ok(Self {
            child: build(AgeBand::Child)?,
            adult: build(AgeBand::Adult)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewbornRule {
    /// Normalized DRG prefix; empty matches every case.
    pub drg_prefix: String,
    pub criterion: Option<NewbornCriterion>,
    pub service: ServiceCode,
}

/// Membership lists consulted by the newborn criteria.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewbornLists {
    pub non_conventional_ventilation: BTreeSet<String>,
    pub controlled_hypothermia: BTreeSet<String>,
    pub palliative_care: BTreeSet<String>,
    pub exchange_transfusion: BTreeSet<String>,
    pub viability: BTreeSet<String>,
    pub significant_procedures: BTreeSet<String>,
    pub severe_problems: BTreeSet<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrgDiagnosisRule {
    pub drg_prefix: String,
    /// `None` matches regardless of diagnoses.
    pub criterion: Option<DrgDiagnosisCriterion>,
    pub service: ServiceCode,
}

/// Row keyed by a principal procedure code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalProcedureRule {
    pub principal: String,
    pub service: ServiceCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcedureCombinationRules {
    pub rules: Vec<PrincipalProcedureRule>,
    /// Acceptable secondary procedures, keyed by the service they lead to.
    pub secondary_groups: BTreeMap<ServiceCode, BTreeSet<String>>,
}

impl ProcedureCombinationRules {
    pub fn secondary_group(&self, service: &ServiceCode) -> Option<&BTreeSet<String>> {
        self.secondary_groups.get(service)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisGroupRule {
    pub principal: String,
    pub group: String,
    pub service: ServiceCode,
}

/// One definition row of a diagnosis group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisGroupEntry {
    pub scope: DiagnosisScope,
    /// Diagnosis code prefixes; more than one when the row was resolved
    /// through a service of the principal-diagnosis annex.
    pub prefixes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisGroup {
    pub entries: Vec<DiagnosisGroupEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosisGroupRules {
    pub rules: Vec<DiagnosisGroupRule>,
    pub groups: BTreeMap<String, DiagnosisGroup>,
}

impl DiagnosisGroupRules {
    pub fn group(&self, name: &str) -> Option<&DiagnosisGroup> {
        self.groups.get(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisListRule {
    pub principal: String,
    /// Expanded diagnosis prefixes.
    pub prefixes: Vec<String>,
    pub service: ServiceCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosisPairRule {
    pub principal: String,
    pub secondary: String,
    pub service: ServiceCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalDiagnosisRule {
    pub principal: String,
    pub service: ServiceCode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganDonorLists {
    pub coma: BTreeSet<String>,
    pub brain_edema: BTreeSet<String>,
    pub selected_diseases: BTreeSet<String>,
}

/// Compiled annex rules, shared read-only by every case evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleBook {
    pub newborn: Vec<NewbornRule>,
    pub newborn_lists: NewbornLists,
    pub drg_diagnosis: AgeBanded<Vec<DrgDiagnosisRule>>,
    pub procedure_combination: AgeBanded<ProcedureCombinationRules>,
    pub diagnosis_group: AgeBanded<DiagnosisGroupRules>,
    pub diagnosis_list: AgeBanded<Vec<DiagnosisListRule>>,
    pub diagnosis_pair: Vec<DiagnosisPairRule>,
    pub radiology: AgeBanded<Vec<PrincipalProcedureRule>>,
    pub procedure: AgeBanded<Vec<PrincipalProcedureRule>>,
    pub principal_diagnosis: AgeBanded<Vec<PrincipalDiagnosisRule>>,
    pub organ_donor: OrganDonorLists,
}

impl RuleBook {
    pub fn compile(store: &ReferenceStore) -> Result<Self, StandardsError> {
        let book = Self {
            newborn: compile_newborn(store.require(schema::NEWBORN)?)?,
            newborn_lists: NewbornLists {
                non_conventional_ventilation: derived(store, "p5_kriterium_nekonvencna_upv_vykony"),
                controlled_hypothermia: derived(store, "p5_kriterium_riadena_hypotermia_vykony"),
                palliative_care: derived(store, "p5_kriterium_paliativna_starostlivost_diagnozy"),
                exchange_transfusion: derived(
                    store,
                    "p5_kriterium_potreba_vymennej_transfuzie_vykony",
                ),
                viability: derived(store, "p5_kriterium_hranica_viability_vykony"),
                significant_procedures: derived(store, "p5_signifikantne_OP_vykony"),
                severe_problems: derived(store, "p5_tazke_problemy_u_novorodencov_diagnozy"),
            },
            drg_diagnosis: AgeBanded::try_build(|band| {
                let name = banded(band, schema::DRG_DIAGNOSIS_CHILD, schema::DRG_DIAGNOSIS_ADULT);
                compile_drg_diagnosis(store.require(name)?)
            })?,
            procedure_combination: AgeBanded::try_build(|band| {
                let (rules, secondary) = match band {
                    AgeBand::Child => (schema::COMBINATION_CHILD, schema::COMBINATION_SECONDARY_CHILD),
                    AgeBand::Adult => (schema::COMBINATION_ADULT, schema::COMBINATION_SECONDARY_ADULT),
                };
                Ok::<_, StandardsError>(ProcedureCombinationRules {
                    rules: compile_principal_procedures(store.require(rules)?),
                    secondary_groups: compile_secondary_groups(store.require(secondary)?),
                })
            })?,
            diagnosis_group: AgeBanded::try_build(|band| compile_diagnosis_groups(store, band))?,
            diagnosis_list: AgeBanded::try_build(|band| {
                let name = banded(band, schema::DIAGNOSIS_LIST_CHILD, schema::DIAGNOSIS_LIST_ADULT);
                match store.table(name) {
                    Some(table) => compile_diagnosis_lists(table),
                    None => Ok(Vec::new()),
                }
            })?,
            diagnosis_pair: compile_diagnosis_pairs(store.require(schema::DIAGNOSIS_PAIRS)?),
            radiology: AgeBanded::try_build(|band| {
                let name = banded(band, schema::RADIOLOGY_CHILD, schema::RADIOLOGY_ADULT);
                Ok::<_, StandardsError>(compile_principal_procedures(store.require(name)?))
            })?,
            procedure: AgeBanded::try_build(|band| {
                let name = banded(band, schema::PROCEDURE_CHILD, schema::PROCEDURE_ADULT);
                Ok::<_, StandardsError>(compile_principal_procedures(store.require(name)?))
            })?,
            principal_diagnosis: AgeBanded::try_build(|band| {
                let name = banded(
                    band,
                    schema::PRINCIPAL_DIAGNOSIS_CHILD,
                    schema::PRINCIPAL_DIAGNOSIS_ADULT,
                );
                Ok::<_, StandardsError>(compile_principal_diagnoses(store.require(name)?))
            })?,
            organ_donor: OrganDonorLists {
                coma: derived(store, "p16_koma_diagnozy"),
                brain_edema: derived(store, "p16_opuch_mozgu_diagnozy"),
                selected_diseases: derived(store, "p16_vybrane_ochorenia_diagnozy"),
            },
        };
        debug!(rules = book.rule_count(), "rule book compiled");
        Ok(book)
    }

    /// Number of service-producing rows across every annex.
    pub fn rule_count(&self) -> usize {
        let banded_len = |child: usize, adult: usize| child + adult;
        self.newborn.len()
            + banded_len(self.drg_diagnosis.child.len(), self.drg_diagnosis.adult.len())
            + banded_len(
                self.procedure_combination.child.rules.len(),
                self.procedure_combination.adult.rules.len(),
            )
            + banded_len(
                self.diagnosis_group.child.rules.len(),
                self.diagnosis_group.adult.rules.len(),
            )
            + banded_len(self.diagnosis_list.child.len(), self.diagnosis_list.adult.len())
            + self.diagnosis_pair.len()
            + banded_len(self.radiology.child.len(), self.radiology.adult.len())
            + banded_len(self.procedure.child.len(), self.procedure.adult.len())
            + banded_len(
                self.principal_diagnosis.child.len(),
                self.principal_diagnosis.adult.len(),
            )
    }
}

fn banded(band: AgeBand, child: &'static str, adult: &'static str) -> &'static str {
    match band {
        AgeBand::Child => child,
        AgeBand::Adult => adult,
    }
}

fn derived(store: &ReferenceStore, list: &str) -> BTreeSet<String> {
    store
        .list(list)
        .map(|codes| codes.iter().cloned().collect())
        .unwrap_or_default()
}

/// Service code of a row; rows without one produce nothing and are skipped.
fn service(table: &ReferenceTable, row: &TableRow) -> Option<ServiceCode> {
    let service = get_optional(row, "kod_ms").map(ServiceCode::new);
    if service.is_none() {
        debug!(table = table.name(), "skipping row without service code");
    }
    service
}

fn compile_newborn(table: &ReferenceTable) -> Result<Vec<NewbornRule>, StandardsError> {
    let mut rules = Vec::with_capacity(table.len());
    for row in table.rows() {
        let Some(service) = service(table, row) else {
            continue;
        };
        let criterion = get_optional(row, "doplnujuce_kriterium")
            .map(str::parse::<NewbornCriterion>)
            .transpose()
            .map_err(|source| StandardsError::UnrecognizedCriterion {
                table: table.name().to_string(),
                source,
            })?;
        rules.push(NewbornRule {
            drg_prefix: get_field(row, "drg").to_string(),
            criterion,
            service,
        });
    }
    Ok(rules)
}

fn compile_drg_diagnosis(table: &ReferenceTable) -> Result<Vec<DrgDiagnosisRule>, StandardsError> {
    let mut rules = Vec::with_capacity(table.len());
    for row in table.rows() {
        let Some(service) = service(table, row) else {
            continue;
        };
        let criterion = get_optional(row, "doplnujuce_kriterium")
            .map(str::parse::<DrgDiagnosisCriterion>)
            .transpose()
            .map_err(|source| StandardsError::UnrecognizedCriterion {
                table: table.name().to_string(),
                source,
            })?;
        rules.push(DrgDiagnosisRule {
            drg_prefix: get_field(row, "drg").to_string(),
            criterion,
            service,
        });
    }
    Ok(rules)
}

fn compile_principal_procedures(table: &ReferenceTable) -> Vec<PrincipalProcedureRule> {
    table
        .rows()
        .iter()
        .filter_map(|row| {
            let principal = get_optional(row, "kod_hlavneho_vykonu")?;
            Some(PrincipalProcedureRule {
                principal: principal.to_string(),
                service: service(table, row)?,
            })
        })
        .collect()
}

fn compile_secondary_groups(table: &ReferenceTable) -> BTreeMap<ServiceCode, BTreeSet<String>> {
    let mut groups: BTreeMap<ServiceCode, BTreeSet<String>> = BTreeMap::new();
    for row in table.rows() {
        let (Some(code), Some(service)) = (get_optional(row, "kod_vykonu"), service(table, row))
        else {
            continue;
        };
        groups.entry(service).or_default().insert(code.to_string());
    }
    groups
}

fn compile_diagnosis_groups(
    store: &ReferenceStore,
    band: AgeBand,
) -> Result<DiagnosisGroupRules, StandardsError> {
    let rule_table = store.require(banded(
        band,
        schema::DIAGNOSIS_GROUP_CHILD,
        schema::DIAGNOSIS_GROUP_ADULT,
    ))?;
    let definitions = store.require(schema::DIAGNOSIS_GROUP_DEFINITIONS)?;
    let related = store.require(banded(
        band,
        schema::PRINCIPAL_DIAGNOSIS_CHILD,
        schema::PRINCIPAL_DIAGNOSIS_ADULT,
    ))?;

    let mut groups: BTreeMap<String, DiagnosisGroup> = BTreeMap::new();
    for row in definitions.rows() {
        let Some(name) = get_optional(row, "skupina_diagnoz") else {
            continue;
        };
        let scope = get_field(row, "rozsah")
            .parse::<DiagnosisScope>()
            .map_err(|source| StandardsError::InvalidScope {
                table: definitions.name().to_string(),
                group: name.to_string(),
                source,
            })?;
        let code = get_field(row, "kod_diagnozy");
        let prefixes = if code.starts_with(RELATIONSHIP_PREFIX) {
            resolve_service_diagnoses(store, name, get_field(row, "popis"), related)?
        } else if code.is_empty() {
            continue;
        } else {
            vec![code.to_string()]
        };
        groups
            .entry(name.to_string())
            .or_default()
            .entries
            .push(DiagnosisGroupEntry { scope, prefixes });
    }

    let mut rules = Vec::with_capacity(rule_table.len());
    for row in rule_table.rows() {
        let (Some(principal), Some(group)) = (
            get_optional(row, "kod_hlavneho_vykonu"),
            get_optional(row, "skupina_diagnoz"),
        ) else {
            continue;
        };
        let Some(service) = service(rule_table, row) else {
            continue;
        };
        if !groups.contains_key(group) {
            return Err(StandardsError::UnknownDiagnosisGroup {
                table: rule_table.name().to_string(),
                group: group.to_string(),
            });
        }
        rules.push(DiagnosisGroupRule {
            principal: principal.to_string(),
            group: group.to_string(),
            service,
        });
    }

    Ok(DiagnosisGroupRules { rules, groups })
}

/// Principal diagnoses of the service quoted in a group description.
///
/// The description names the service between `„` and `“` (or plain double
/// quotes). The name is looked up in the `kod_ms` column, or `nazov_ms` when
/// present, of the principal-diagnosis table for this age band. A service
/// known only to the other age band resolves to no diagnoses here.
fn resolve_service_diagnoses(
    store: &ReferenceStore,
    group: &str,
    description: &str,
    related: &ReferenceTable,
) -> Result<Vec<String>, StandardsError> {
    let unresolved = |service: &str| StandardsError::UnresolvedServiceGroup {
        group: group.to_string(),
        service: service.to_string(),
        tables: format!(
            "{}, {}",
            schema::PRINCIPAL_DIAGNOSIS_CHILD,
            schema::PRINCIPAL_DIAGNOSIS_ADULT
        ),
    };
    let service = quoted_service_name(description).ok_or_else(|| unresolved(description))?;

    let names_service = |row: &TableRow| {
        get_field(row, "kod_ms") == service
            || get_optional(row, SERVICE_NAME_COLUMN).is_some_and(|name| name == service)
    };
    let diagnoses_of = |table: &ReferenceTable| -> Vec<String> {
        table
            .rows()
            .iter()
            .filter(|row| names_service(*row))
            .filter_map(|row| get_optional(row, "kod_hlavnej_diagnozy"))
            .map(str::to_string)
            .collect()
    };

    let prefixes = diagnoses_of(related);
    if prefixes.is_empty() {
        let known_elsewhere = [
            schema::PRINCIPAL_DIAGNOSIS_CHILD,
            schema::PRINCIPAL_DIAGNOSIS_ADULT,
        ]
        .into_iter()
        .filter(|name| *name != related.name())
        .filter_map(|name| store.table(name))
        .any(|table| !diagnoses_of(table).is_empty());
        if !known_elsewhere {
            return Err(unresolved(service));
        }
        debug!(group, service, table = related.name(), "service not in this age band");
    }
    Ok(prefixes)
}

fn quoted_service_name(description: &str) -> Option<&str> {
    [('„', '“'), ('“', '”'), ('"', '"')]
        .into_iter()
        .find_map(|(open, close)| {
            let start = description.find(open)? + open.len_utf8();
            let rest = &description[start..];
            let end = rest.find(close)?;
            Some(rest[..end].trim()).filter(|name| !name.is_empty())
        })
}

fn compile_diagnosis_lists(table: &ReferenceTable) -> Result<Vec<DiagnosisListRule>, StandardsError> {
    let mut rules = Vec::with_capacity(table.len());
    for row in table.rows() {
        let Some(principal) = get_optional(row, "kod_hlavneho_vykonu") else {
            continue;
        };
        let Some(service) = service(table, row) else {
            continue;
        };
        let entries = normalize_code_list(get_field(row, "zoznam_diagnoz"));
        let prefixes = expand_code_list(&entries).map_err(|(entry, message)| {
            StandardsError::InvalidCodeRange {
                table: table.name().to_string(),
                entry,
                message,
            }
        })?;
        rules.push(DiagnosisListRule {
            principal: principal.to_string(),
            prefixes,
            service,
        });
    }
    Ok(rules)
}

fn compile_diagnosis_pairs(table: &ReferenceTable) -> Vec<DiagnosisPairRule> {
    table
        .rows()
        .iter()
        .filter_map(|row| {
            Some(DiagnosisPairRule {
                principal: get_optional(row, "kod_hlavnej_diagnozy")?.to_string(),
                secondary: get_optional(row, "kod_vedlajsej_diagnozy")?.to_string(),
                service: service(table, row)?,
            })
        })
        .collect()
}

fn compile_principal_diagnoses(table: &ReferenceTable) -> Vec<PrincipalDiagnosisRule> {
    table
        .rows()
        .iter()
        .filter_map(|row| {
            Some(PrincipalDiagnosisRule {
                principal: get_optional(row, "kod_hlavnej_diagnozy")?.to_string(),
                service: service(table, row)?,
            })
        })
        .collect()
}
