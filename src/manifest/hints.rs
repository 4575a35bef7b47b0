//! Substring-keyed hints attached to YAML parse diagnostics.

pub(crate) const YAML_HINTS: [(&str, &str); 8] = [
    (
        "did not find expected '-'",
        "Sequence entries such as types and steps need a leading '-' at a consistent indent.",
    ),
    (
        "expected ':'",
        "Separate every key from its value with ':'.",
    ),
    (
        "mapping values are not allowed",
        "A value contains a bare ':'; quote it or fix the indentation above it.",
    ),
    (
        "found character that cannot start any token",
        "Indent with spaces; tabs and stray characters are not valid YAML.",
    ),
    (
        "unknown field",
        "Check the key name; a Wirefile accepts wire_version, platforms, layout, types and steps.",
    ),
    (
        "malformed type name",
        "Use fully qualified type names such as com.example.actions.PaymentActions.",
    ),
    (
        "unknown variant",
        "Platforms are ios and droid; type kinds are class, abstract_class and interface.",
    ),
    (
        "platform selection is empty",
        "Name at least one platform, or remove the platforms key to generate for every platform.",
    ),
];
