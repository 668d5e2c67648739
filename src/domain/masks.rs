//! Display masks for Brazilian identity and address fields.
//!
//! Every mask keeps only ASCII digits, truncates them to the field's digit
//! count and lays them into a positional template. A separator is only
//! written once a digit follows it, so partially typed input yields a
//! partial mask. Masks never fail and are idempotent.

const TAX_ID_TEMPLATE: &str = "###.###.###-##";
const PHONE_TEMPLATE: &str = "(##) #####-####";
const POSTAL_CODE_TEMPLATE: &str = "#####-###";

/// Length of a fully masked postal code (`01001-000`).
pub const POSTAL_CODE_MASKED_LEN: usize = 9;

/// Formats a CPF as `123.456.789-00`.
pub fn mask_tax_id(value: &str) -> String {
    apply_template(value, TAX_ID_TEMPLATE)
}

/// Formats a mobile number as `(11) 98765-4321`.
pub fn mask_phone(value: &str) -> String {
    apply_template(value, PHONE_TEMPLATE)
}

/// Formats a CEP as `01001-000`.
pub fn mask_postal_code(value: &str) -> String {
    apply_template(value, POSTAL_CODE_TEMPLATE)
}

/// Returns only the ASCII digits of `value`.
pub fn digits(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

fn apply_template(value: &str, template: &str) -> String {
    let slots = template.chars().filter(|c| *c == '#').count();
    let mut digits = value.chars().filter(char::is_ascii_digit).take(slots);

    let mut masked = String::with_capacity(template.len());
    let mut separators = String::new();
    for slot in template.chars() {
        if slot != '#' {
            separators.push(slot);
            continue;
        }
        match digits.next() {
            Some(digit) => {
                masked.push_str(&separators);
                separators.clear();
                masked.push(digit);
            }
            None => break,
        }
    }
    masked
}
