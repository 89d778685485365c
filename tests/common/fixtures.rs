//! A small single-cell catalog used across harnesses.
//!
//! `child` edges run from the broader term to the narrower one:
//!
//! ```text
//! cell ─┬─ B cell                 disease ── cancer ─┬─ breast cancer
//!       ├─ T cell ── CD4+ T cell                     └─ lymphoma
//!       └─ hepatocyte
//! organ ─┬─ liver    blood        Mammalia ─┬─ Homo sapiens
//!        └─ kidney                          └─ Mus musculus
//! ```

use super::builders::{GraphBuilder, RecordBuilder, TermBuilder};
use ontofacet::FacetCategory::{CellTypes, Diseases, Organism, Tissues};

pub const CELL: &str = "CL:0000000";
pub const B_CELL: &str = "CL:0000236";
pub const T_CELL: &str = "CL:0000084";
pub const CD4_T_CELL: &str = "CL:0000624";
pub const HEPATOCYTE: &str = "CL:0000182";

pub const DISEASE: &str = "MONDO:0000001";
pub const CANCER: &str = "MONDO:0004992";
pub const BREAST_CANCER: &str = "MONDO:0007254";
pub const LYMPHOMA: &str = "MONDO:0005062";

pub const ORGAN: &str = "UBERON:0000062";
pub const LIVER: &str = "UBERON:0002107";
pub const KIDNEY: &str = "UBERON:0002113";
pub const BLOOD: &str = "UBERON:0000178";

pub const MAMMALIA: &str = "NCBITaxon:40674";
pub const HUMAN: &str = "NCBITaxon:9606";
pub const MOUSE: &str = "NCBITaxon:10090";

const CL: &str = "Cell Ontology";
const MONDO: &str = "Mondo Disease Ontology";
const UBERON: &str = "UBERON";
const EFO: &str = "Experimental Factor Ontology";

pub fn catalog() -> GraphBuilder {
    GraphBuilder::new()
        .term(TermBuilder::new(CELL, "cell").source(CL).child(B_CELL).child(T_CELL).child(HEPATOCYTE))
        .term(TermBuilder::new(B_CELL, "B cell").source(CL))
        .term(TermBuilder::new(T_CELL, "T cell").source(CL).child(CD4_T_CELL))
        .term(TermBuilder::new(CD4_T_CELL, "CD4-positive, alpha-beta T cell").source(CL))
        .term(TermBuilder::new(HEPATOCYTE, "hepatocyte").source(CL))
        .term(TermBuilder::new(DISEASE, "disease").source(MONDO).child(CANCER))
        .term(TermBuilder::new(CANCER, "cancer").source(MONDO).child(BREAST_CANCER).child(LYMPHOMA))
        .term(TermBuilder::new(BREAST_CANCER, "breast cancer").source(MONDO))
        .term(TermBuilder::new(LYMPHOMA, "lymphoma").source(MONDO))
        .term(TermBuilder::new(ORGAN, "organ").source(UBERON).child(LIVER).child(KIDNEY))
        .term(TermBuilder::new(LIVER, "liver").source(UBERON))
        .term(TermBuilder::new(KIDNEY, "kidney").source(UBERON))
        .term(TermBuilder::new(BLOOD, "blood").source(UBERON))
        .term(TermBuilder::new(MAMMALIA, "Mammalia").source(EFO).child(HUMAN).child(MOUSE))
        .term(TermBuilder::new(HUMAN, "Homo sapiens").source(EFO))
        .term(TermBuilder::new(MOUSE, "Mus musculus").source(EFO))
        .record(
            RecordBuilder::new("GSE1", "Human liver atlas")
                .keywords("single cell, atlas")
                .cells(52_000)
                .facet(CellTypes, HEPATOCYTE)
                .facet(Tissues, LIVER)
                .facet(Organism, HUMAN),
        )
        .record(
            RecordBuilder::new("GSE2", "Mouse kidney T cell survey")
                .facet(CellTypes, T_CELL)
                .facet(Tissues, KIDNEY)
                .facet(Organism, MOUSE),
        )
        .record(
            RecordBuilder::new("GSE3", "Lymphoma B cell profiling")
                .cells(8_000)
                .facet(CellTypes, B_CELL)
                .facet(Diseases, LYMPHOMA)
                .facet(Tissues, BLOOD)
                .facet(Organism, HUMAN),
        )
        .record(
            RecordBuilder::new("GSE4", "Breast cancer CD4 T cells")
                .facet(CellTypes, CD4_T_CELL)
                .facet(Diseases, BREAST_CANCER)
                .facet(Organism, HUMAN),
        )
        .record(
            RecordBuilder::new("GSE5", "Delivery of hepatic organoids")
                .description("liver-derived organoid culture")
                .facet(CellTypes, HEPATOCYTE)
                .facet(Organism, MOUSE),
        )
}
