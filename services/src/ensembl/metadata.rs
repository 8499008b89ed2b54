use rootstock_core::metadata::{MetadataError, SchemaTerm, ServiceMetadata};

/// Query and retrieval: search or query a data resource.
pub const CATEGORY_TERM: &str = "operation_0304";
/// Sequence identifier.
pub const INPUT_TERM: &str = "data_1063";
/// Sequence.
pub const OUTPUT_TERM: &str = "data_2044";

pub(crate) fn build_metadata() -> Result<ServiceMetadata, MetadataError> {
    let category = SchemaTerm::edam(
        CATEGORY_TERM,
        "Query and retrieval",
        "Search or query a data resource and retrieve entries and / or annotation.",
    )?;

    let input = SchemaTerm::edam(
        INPUT_TERM,
        "Sequence identifier",
        "An identifier of molecular sequence(s) or entries from a molecular sequence database.",
    )?;

    let output = SchemaTerm::edam(
        OUTPUT_TERM,
        "Sequence",
        "This concept is a placeholder of concepts for primary sequence data including raw \
         sequences and sequence records. It should not normally be used for derivatives such as \
         sequence alignments, motifs or profiles. One or more molecular sequences, possibly with \
         associated annotation.",
    )?;

    Ok(ServiceMetadata::new(category).with_input(input).with_output(output))
}
