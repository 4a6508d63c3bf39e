/// Instruction sent verbatim with every photo.
///
/// The keys listed here are the ones `PlantRecord` exposes accessors for.
pub const IDENTIFICATION_PROMPT: &str = "\
Identify the plant in this photo and provide its name and important information. \
Answer with one `key: value` line per field, using exactly these keys:
name: the common name
scientificName: the botanical (Latin) name
family: the plant family
origin: where the plant is native to
uses: how the plant is used (ornamental, culinary, medicinal, ...)
description: a short description of the plant and how to recognise it
Do not add any other text before or after these lines.";
