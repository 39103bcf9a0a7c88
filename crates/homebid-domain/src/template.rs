//! Default offer letter template and export assembly

/// Blank offer letter shown for offers that have never been saved
pub const DEFAULT_OFFER_TEMPLATE: &str = r#"
# Offer Letter

**Date:** [Insert Date]

**Buyer(s):** [Your Full Name]

**Seller(s):** [Seller's Full Name]

**Property Address:** [Full Address of the Property]

**Purchase Price:** $[Insert Purchase Price]

**Earnest Money Deposit:** $[Insert Amount] (to be deposited within [x] days of the offer acceptance)

### Financing Contingency:
This offer is contingent upon the Buyer securing a mortgage loan with the following terms:
- **Loan Type:** [e.g., Conventional, FHA, VA]
- **Loan Amount:** $[Loan Amount]
- **Interest Rate Not to Exceed:** [e.g., 5.5%]
- **Loan Term:** [e.g., 30 years fixed]
- **Financing Contingency Period:** [e.g., 21 days]

### Inspection Contingency:
Buyer has [e.g., 10 days] from the date of acceptance to conduct any desired inspections of the property. If unsatisfactory results are found, Buyer reserves the right to negotiate repairs or terminate the agreement.

### Closing Date:
The closing shall occur on or before [Insert Closing Date, e.g., 30 days from acceptance].

### Additional Terms/Conditions:
- The property is to be sold "as-is," with the exception of agreed-upon repairs, if any.
- Buyer requests a home warranty to be provided at Seller's expense.
- Personal property to be included: [e.g., Refrigerator, Washer, Dryer, etc.]

### Expiration of Offer:
This offer is valid until [Insert Date/Time, e.g., 48 hours from submission].

## Signatures:
__________________________
**Buyer Name**
__________________________
**Seller Name**
"#;

/// Assemble the exportable markdown for an offer: an optional client header
/// (name, address, rule) followed by the letter body.
///
/// Blank content falls back to the default template so an export is never
/// empty.
pub fn render_export(client_name: &str, client_address: &str, content: &str) -> String {
    let body = if content.trim().is_empty() {
        DEFAULT_OFFER_TEMPLATE
    } else {
        content
    };

    let mut markdown = String::new();

    if !client_name.is_empty() || !client_address.is_empty() {
        let title = if client_name.is_empty() {
            "Untitled Offer"
        } else {
            client_name
        };
        markdown.push_str(&format!("# {}\n\n", title));
        if !client_address.is_empty() {
            markdown.push_str(&format!("{}\n\n", client_address));
        }
        markdown.push_str("---\n\n");
    }

    markdown.push_str(body);
    markdown
}

/// Filename for a downloaded offer: the client name with every
/// non-alphanumeric run replaced by underscores, lowercased, plus the
/// `_offer.md` suffix. Falls back to `offer.md` when no client name is set.
pub fn export_filename(client_name: &str) -> String {
    if client_name.is_empty() {
        return "offer.md".to_string();
    }

    let slug: String = client_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();

    format!("{}_offer.md", slug.to_lowercase())
}
