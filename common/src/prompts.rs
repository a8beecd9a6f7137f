//! Prompt generation
//!
//! Everything sent to the model except the image itself:
//! - SIZES: the fixed size grid
//! - build_system_instruction: role, size grid, language, width rule
//! - build_user_prompt: per-class roll width clauses
//! - response_schema: the JSON shape the model must answer with

use crate::i18n::Language;
use crate::types::{MaterialClass, RollWidths};
use serde_json::{json, Value};

/// Size grid enumerated in every request
pub const SIZES: &[&str] = &["S", "M", "L", "XL", "XXL"];

/// Fields every row must carry
pub const REQUIRED_FIELDS: &[&str] = &[
    "size",
    "backLength",
    "chestWidth",
    "sleeveLength",
    "mainFabric",
    "liningFabric",
    "hardware",
];

/// Everything the provider needs besides the image
#[derive(Debug, Clone, PartialEq)]
pub struct PromptBundle {
    pub system_instruction: String,
    pub user_prompt: String,
    pub response_schema: Value,
}

/// Build the full prompt bundle
pub fn build_prompt(widths: &RollWidths, language: Language) -> PromptBundle {
    PromptBundle {
        system_instruction: build_system_instruction(language),
        user_prompt: build_user_prompt(widths, language),
        response_schema: response_schema(),
    }
}

/// Output language as named inside the system instruction
fn instruction_language_name(language: Language) -> &'static str {
    match language {
        Language::Uk => "українською",
        Language::Ru => "російською",
        Language::En => "English",
    }
}

/// Output language as named inside the user prompt
fn prompt_language_name(language: Language) -> &'static str {
    match language {
        Language::Uk => "українською",
        Language::Ru => "російською",
        Language::En => "англійською",
    }
}

/// System instruction generation
///
/// Fixes the role, the size grid and the output language.
pub fn build_system_instruction(language: Language) -> String {
    let sizes = SIZES.join(", ");
    let lang_name = instruction_language_name(language);

    format!(
        r#"Ти — експертний технолог швейного виробництва.
Твоє завдання — проаналізувати зображення куртки та надати детальну технічну інформацію.
1. Визнач тип куртки.
2. Для кожного розміру ({sizes}) визнач:
   - Орієнтовні виміри готового виробу: Довжина по спинці, Напівобхват грудей, Довжина рукава. Базуйся на стандартних розмірних сітках для верхнього одягу.
   - Розрахуй витрати тканини та фурнітури.
3. СУВОРО дотримуйся вказаної ширини тканини при розрахунках, якщо вона надана користувачем.
4. Результат має бути виключно мовою: {lang_name}."#
    )
}

/// Roll width clause label per material class
fn width_label(class: MaterialClass) -> &'static str {
    match class {
        MaterialClass::Main => "Ширина ОСНОВНОЇ тканини",
        MaterialClass::Lining => "Ширина ПІДКЛАДКИ",
        MaterialClass::Insulation => "Ширина УТЕПЛЮВАЧА",
    }
}

/// Sentence used when no width was given for any class
pub const STANDARD_WIDTH_FALLBACK: &str = "Використовуй стандартну ширину рулону для всіх тканин (зазвичай 1.4-1.5м), оскільки користувач не вказав специфічних даних.";

/// User prompt generation
///
/// # Arguments
/// * `widths` - roll widths in cm, `None` where the user left the field empty
/// * `language` - response language
///
/// # Returns
/// The preamble plus either per-class width clauses or the standard-width fallback
pub fn build_user_prompt(widths: &RollWidths, language: Language) -> String {
    let sizes = SIZES.join(", ");
    let lang_name = prompt_language_name(language);

    let mut prompt = format!(
        "Проаналізуй цю куртку. Склади таблицю параметрів виробу та витрат матеріалів для розмірів {sizes}. Мова відповіді: {lang_name}."
    );

    if widths.any() {
        prompt.push_str("\n\nВАЖЛИВО: Виконай розрахунок витрат (розкладку) базуючись на наступних параметрах ширини рулону:\n");
        for class in MaterialClass::ALL {
            let label = width_label(class);
            match widths.get(class) {
                Some(width) => prompt.push_str(&format!("- {}: {} см.\n", label, width)),
                None => prompt.push_str(&format!("- {}: Стандартна (визнач сама).\n", label)),
            }
        }
    } else {
        prompt.push_str("\n\n");
        prompt.push_str(STANDARD_WIDTH_FALLBACK);
    }

    prompt
}

/// Response schema (Gemini `responseSchema` format)
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "size": { "type": "STRING", "description": "Size label (S, M, L, XL, etc)" },
                "backLength": { "type": "STRING", "description": "Back length in cm with unit" },
                "chestWidth": { "type": "STRING", "description": "Chest width (half-girth) in cm with unit" },
                "sleeveLength": { "type": "STRING", "description": "Sleeve length from shoulder in cm with unit" },
                "mainFabric": { "type": "STRING", "description": "Main fabric usage in meters with unit" },
                "liningFabric": { "type": "STRING", "description": "Lining fabric usage in meters with unit" },
                "insulation": { "type": "STRING", "description": "Insulation usage (if any) or dash" },
                "hardware": { "type": "STRING", "description": "List of hardware (zippers, buttons, etc) translated to target language" },
                "notes": { "type": "STRING", "description": "Short notes in target language" }
            },
            "required": REQUIRED_FIELDS
        }
    })
}
