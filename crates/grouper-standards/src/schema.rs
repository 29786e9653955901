//! Expected annex tables, their columns and the lists derived from them.

/// How a column is prepared when the table is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Single code, normalized.
    Code,
    /// Comma-separated code list, normalized entry by entry.
    CodeList,
    /// Kept as written (service codes, criterion names, descriptions).
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    pub name: &'static str,
    pub columns: &'static [ColumnSpec],
    pub required: bool,
}

/// Flattened list of one column of one table.
#[derive(Debug, Clone, Copy)]
pub struct DerivedList {
    pub name: &'static str,
    pub table: &'static str,
    pub column: &'static str,
}

const fn code(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Code,
    }
}

const fn code_list(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::CodeList,
    }
}

const fn text(name: &'static str) -> ColumnSpec {
    ColumnSpec {
        name,
        kind: ColumnKind::Text,
    }
}

const fn required(name: &'static str, columns: &'static [ColumnSpec]) -> TableSpec {
    TableSpec {
        name,
        columns,
        required: true,
    }
}

const fn optional(name: &'static str, columns: &'static [ColumnSpec]) -> TableSpec {
    TableSpec {
        name,
        columns,
        required: false,
    }
}

const DRG_CRITERION: &[ColumnSpec] = &[code("drg"), text("doplnujuce_kriterium"), text("kod_ms")];
const PROCEDURE_LIST: &[ColumnSpec] = &[code("kod_vykonu")];
const DIAGNOSIS_LIST: &[ColumnSpec] = &[code("kod_diagnozy")];
const PRINCIPAL_PROCEDURE: &[ColumnSpec] = &[code("kod_hlavneho_vykonu"), text("kod_ms")];
const SECONDARY_PROCEDURE: &[ColumnSpec] = &[code("kod_vykonu"), text("kod_ms")];
const PRINCIPAL_DIAGNOSIS: &[ColumnSpec] = &[code("kod_hlavnej_diagnozy"), text("kod_ms")];
const PROCEDURE_DIAGNOSIS_GROUP: &[ColumnSpec] = &[
    code("kod_hlavneho_vykonu"),
    text("skupina_diagnoz"),
    text("kod_ms"),
];
const PROCEDURE_DIAGNOSIS_LIST: &[ColumnSpec] = &[
    code("kod_hlavneho_vykonu"),
    code_list("zoznam_diagnoz"),
    text("kod_ms"),
];
const DIAGNOSIS_GROUPS: &[ColumnSpec] = &[
    text("skupina_diagnoz"),
    text("rozsah"),
    code("kod_diagnozy"),
    text("popis"),
];
const DIAGNOSIS_PAIR: &[ColumnSpec] = &[
    code("kod_hlavnej_diagnozy"),
    code("kod_vedlajsej_diagnozy"),
    text("kod_ms"),
];

pub const NEWBORN: &str = "p5_NOV";
pub const NEWBORN_VENTILATION: &str = "p5_kriterium_nekonvencna_upv";
pub const NEWBORN_HYPOTHERMIA: &str = "p5_kriterium_riadena_hypotermia";
pub const NEWBORN_PALLIATIVE: &str = "p5_kriterium_paliativna_starostlivost";
pub const NEWBORN_TRANSFUSION: &str = "p5_kriterium_potreba_vymennej_transfuzie";
pub const NEWBORN_VIABILITY: &str = "p5_kriterium_hranica_viability";
pub const SIGNIFICANT_PROCEDURES: &str = "p5_signifikantne_OP";
pub const SEVERE_NEWBORN_PROBLEMS: &str = "p5_tazke_problemy_u_novorodencov";
pub const DRG_DIAGNOSIS_CHILD: &str = "p6_DRGD_deti";
pub const DRG_DIAGNOSIS_ADULT: &str = "p6_DRGD_dospeli";
pub const COMBINATION_CHILD: &str = "p7_VV_deti";
pub const COMBINATION_SECONDARY_CHILD: &str = "p7_vedlajsie_vykony";
pub const COMBINATION_ADULT: &str = "p8_VV_dospeli";
pub const COMBINATION_SECONDARY_ADULT: &str = "p8_vedlajsie_vykony";
pub const DIAGNOSIS_GROUP_CHILD: &str = "p9_VD_deti";
pub const DIAGNOSIS_GROUP_ADULT: &str = "p9_VD_dospeli";
pub const DIAGNOSIS_LIST_CHILD: &str = "p9_VD_zoznam_deti";
pub const DIAGNOSIS_LIST_ADULT: &str = "p9_VD_zoznam_dospeli";
pub const DIAGNOSIS_GROUP_DEFINITIONS: &str = "p9_skupiny_diagnoz";
pub const DIAGNOSIS_PAIRS: &str = "p10_DD";
pub const RADIOLOGY_CHILD: &str = "p11_deti";
pub const RADIOLOGY_ADULT: &str = "p11_dospeli";
pub const PROCEDURE_CHILD: &str = "p12";
pub const PROCEDURE_ADULT: &str = "p13";
pub const PRINCIPAL_DIAGNOSIS_CHILD: &str = "p14";
pub const PRINCIPAL_DIAGNOSIS_ADULT: &str = "p15";
pub const ORGAN_DONOR_COMA: &str = "p16_koma";
pub const ORGAN_DONOR_BRAIN_EDEMA: &str = "p16_opuch_mozgu";
pub const ORGAN_DONOR_SELECTED_DISEASES: &str = "p16_vybrane_ochorenia";

/// Every table the loader knows about. Other files are loaded as plain text.
pub const TABLE_SPECS: &[TableSpec] = &[
    required(NEWBORN, DRG_CRITERION),
    required(NEWBORN_VENTILATION, PROCEDURE_LIST),
    required(NEWBORN_HYPOTHERMIA, PROCEDURE_LIST),
    required(NEWBORN_PALLIATIVE, DIAGNOSIS_LIST),
    required(NEWBORN_TRANSFUSION, PROCEDURE_LIST),
    optional(NEWBORN_VIABILITY, PROCEDURE_LIST),
    required(SIGNIFICANT_PROCEDURES, PROCEDURE_LIST),
    required(SEVERE_NEWBORN_PROBLEMS, DIAGNOSIS_LIST),
    required(DRG_DIAGNOSIS_CHILD, DRG_CRITERION),
    required(DRG_DIAGNOSIS_ADULT, DRG_CRITERION),
    required(COMBINATION_CHILD, PRINCIPAL_PROCEDURE),
    required(COMBINATION_SECONDARY_CHILD, SECONDARY_PROCEDURE),
    required(COMBINATION_ADULT, PRINCIPAL_PROCEDURE),
    required(COMBINATION_SECONDARY_ADULT, SECONDARY_PROCEDURE),
    required(DIAGNOSIS_GROUP_CHILD, PROCEDURE_DIAGNOSIS_GROUP),
    required(DIAGNOSIS_GROUP_ADULT, PROCEDURE_DIAGNOSIS_GROUP),
    optional(DIAGNOSIS_LIST_CHILD, PROCEDURE_DIAGNOSIS_LIST),
    optional(DIAGNOSIS_LIST_ADULT, PROCEDURE_DIAGNOSIS_LIST),
    required(DIAGNOSIS_GROUP_DEFINITIONS, DIAGNOSIS_GROUPS),
    required(DIAGNOSIS_PAIRS, DIAGNOSIS_PAIR),
    required(RADIOLOGY_CHILD, PRINCIPAL_PROCEDURE),
    required(RADIOLOGY_ADULT, PRINCIPAL_PROCEDURE),
    required(PROCEDURE_CHILD, PRINCIPAL_PROCEDURE),
    required(PROCEDURE_ADULT, PRINCIPAL_PROCEDURE),
    required(PRINCIPAL_DIAGNOSIS_CHILD, PRINCIPAL_DIAGNOSIS),
    required(PRINCIPAL_DIAGNOSIS_ADULT, PRINCIPAL_DIAGNOSIS),
    required(ORGAN_DONOR_COMA, DIAGNOSIS_LIST),
    required(ORGAN_DONOR_BRAIN_EDEMA, DIAGNOSIS_LIST),
    required(ORGAN_DONOR_SELECTED_DISEASES, DIAGNOSIS_LIST),
];

const fn derived(name: &'static str, table: &'static str, column: &'static str) -> DerivedList {
    DerivedList {
        name,
        table,
        column,
    }
}

pub const DERIVED_LISTS: &[DerivedList] = &[
    derived(
        "p5_kriterium_nekonvencna_upv_vykony",
        NEWBORN_VENTILATION,
        "kod_vykonu",
    ),
    derived(
        "p5_kriterium_riadena_hypotermia_vykony",
        NEWBORN_HYPOTHERMIA,
        "kod_vykonu",
    ),
    derived(
        "p5_kriterium_paliativna_starostlivost_diagnozy",
        NEWBORN_PALLIATIVE,
        "kod_diagnozy",
    ),
    derived(
        "p5_kriterium_potreba_vymennej_transfuzie_vykony",
        NEWBORN_TRANSFUSION,
        "kod_vykonu",
    ),
    derived(
        "p5_kriterium_hranica_viability_vykony",
        NEWBORN_VIABILITY,
        "kod_vykonu",
    ),
    derived("p5_signifikantne_OP_vykony", SIGNIFICANT_PROCEDURES, "kod_vykonu"),
    derived(
        "p5_tazke_problemy_u_novorodencov_diagnozy",
        SEVERE_NEWBORN_PROBLEMS,
        "kod_diagnozy",
    ),
    derived("p16_koma_diagnozy", ORGAN_DONOR_COMA, "kod_diagnozy"),
    derived("p16_opuch_mozgu_diagnozy", ORGAN_DONOR_BRAIN_EDEMA, "kod_diagnozy"),
    derived(
        "p16_vybrane_ochorenia_diagnozy",
        ORGAN_DONOR_SELECTED_DISEASES,
        "kod_diagnozy",
    ),
];

pub fn table_spec(name: &str) -> Option<&'static TableSpec> {
    TABLE_SPECS.iter().find(|spec| spec.name == name)
}
