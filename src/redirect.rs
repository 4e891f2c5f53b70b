//! Redirect stubs: forwarding documents left at renamed paths.

/// Frontmatter line that marks a document as a redirect stub.
const REDIRECT_MARKER: &str = "document_type: redirect";

/// True if this content is a redirect stub from a harmonize run.
/// Stubs are never themselves renamed, which is what makes re-entry after
/// a partial run a no-op.
pub fn is_redirect_stub(content: &str) -> bool {
    let mut lines = content.lines();
    if lines.next().map(str::trim) != Some("---") {
        return false;
    }

    for line in lines {
        let trimmed = line.trim();
        if trimmed == "---" {
            return false;
        }
        if trimmed == REDIRECT_MARKER {
            return true;
        }
    }

    false
}

/// Render the fixed-shape forwarding document for a renamed file.
///
/// Renames never change directories, so the relative path from the stub to
/// the new file is the new basename itself. The old path is overwritten
/// with this stub and never deleted, keeping old external references
/// resolving to valid content.
pub fn stub_content(new_name: &str) -> String {
    format!(
        "\
---
document_type: redirect
classification: internal
status: approved
version: 1.0.0
applies_to: [platform-wide]
---

# Redirect Notice

This document has been moved to [{new_name}]({new_name}) as part of the file naming convention standardization.

Please update your bookmarks and references.

---

<meta http-equiv=\"refresh\" content=\"0;url={new_name}\">
"
    )
}
