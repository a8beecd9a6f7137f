//! UI strings per language
//!
//! One static bundle per supported language. Everything user-facing goes
//! through [`texts`]; components never hold their own literals.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported display/response languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Uk,
    En,
    Ru,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Uk, Language::En, Language::Ru];

    pub fn code(&self) -> &'static str {
        match self {
            Language::Uk => "uk",
            Language::En => "en",
            Language::Ru => "ru",
        }
    }

    /// Name of the language in itself, for menus
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::Uk => "Українська",
            Language::En => "English",
            Language::Ru => "Русский",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "uk" | "ua" | "ukrainian" => Ok(Language::Uk),
            "en" | "english" => Ok(Language::En),
            "ru" | "russian" => Ok(Language::Ru),
            _ => Err(format!("Unknown language: {}. Use uk, en, or ru", s)),
        }
    }
}

/// Strings bundle
#[derive(Debug)]
pub struct Texts {
    pub app_title: &'static str,
    pub app_subtitle: &'static str,

    // settings
    pub settings_title: &'static str,
    pub main_fabric: &'static str,
    pub width: &'static str,
    pub price: &'static str,
    pub cm: &'static str,
    pub info_text: &'static str,

    // status
    pub analyzing: &'static str,
    pub calculating_for: &'static str,
    pub using_standard: &'static str,
    pub error_title: &'static str,
    pub retry: &'static str,
    pub recalculate: &'static str,
    pub cancelled: &'static str,
    pub not_an_image: &'static str,

    // table
    pub results_title: &'static str,
    pub results_subtitle: &'static str,
    pub size: &'static str,
    pub length: &'static str,
    pub back: &'static str,
    pub chest: &'static str,
    pub half_girth: &'static str,
    pub sleeve: &'static str,
    pub from_shoulder: &'static str,
    pub main: &'static str,
    pub lining_fabric: &'static str,
    pub insulation: &'static str,
    pub hardware: &'static str,
    pub notes: &'static str,
    pub cost: &'static str,
    pub currency: &'static str,
    pub formula_title: &'static str,
    pub formula: &'static str,
    pub disclaimer: &'static str,

    // interactive session
    pub menu_hint: &'static str,
    pub menu_prompt: &'static str,
    pub image_prompt: &'static str,
    pub image_cleared: &'static str,
    pub no_image: &'static str,
    pub saved_to: &'static str,
}

static UK: Texts = Texts {
    app_title: "Калькулятор витрат тканини",
    app_subtitle: "Завантажте фото куртки, щоб отримати розрахунок витрат матеріалів для розмірів S–XXL",
    settings_title: "Параметри тканини",
    main_fabric: "Основна тканина",
    width: "Ширина рулону",
    price: "Ціна за метр",
    cm: "см",
    info_text: "Якщо ширину не вказано, ШІ використає стандартну ширину рулону (1.4–1.5 м).",
    analyzing: "Аналізуємо зображення...",
    calculating_for: "Розрахунок для ширини",
    using_standard: "Використовуємо стандартну ширину рулону",
    error_title: "Помилка аналізу",
    retry: "Спробувати ще раз",
    recalculate: "Перерахувати",
    cancelled: "Аналіз скасовано, зображення прибрано",
    not_an_image: "Будь ласка, завантажте файл зображення (JPEG, PNG, WEBP).",
    results_title: "Таблиця витрат матеріалів",
    results_subtitle: "Орієнтовні значення, розраховані ШІ на основі фото",
    size: "Розмір",
    length: "Довжина",
    back: "по спинці",
    chest: "Груди",
    half_girth: "напівобхват",
    sleeve: "Рукав",
    from_shoulder: "від плеча",
    main: "Основна",
    lining_fabric: "Підкладка",
    insulation: "Утеплювач",
    hardware: "Фурнітура",
    notes: "Примітки",
    cost: "Вартість",
    currency: "грн",
    formula_title: "Формула розрахунку",
    formula: "Матеріали (основна + підкладка + утеплювач) + 15% від вартості основної тканини та підкладки на фурнітуру.",
    disclaimer: "Результати є орієнтовними. Вкажіть ціни, щоб побачити вартість.",
    menu_hint: "[r]перерахувати [t]повторити [w]ширина/ціни [l]мова [n]нове фото [c]прибрати фото [s]зберегти [q]вихід",
    menu_prompt: "Дія",
    image_prompt: "Шлях до фото куртки",
    image_cleared: "Зображення прибрано",
    no_image: "Фото не вибрано",
    saved_to: "Збережено",
};

static EN: Texts = Texts {
    app_title: "Fabric Consumption Calculator",
    app_subtitle: "Upload a jacket photo to get material consumption for sizes S–XXL",
    settings_title: "Fabric settings",
    main_fabric: "Main fabric",
    width: "Roll width",
    price: "Price per meter",
    cm: "cm",
    info_text: "If no width is given, the AI uses a standard roll width (1.4–1.5 m).",
    analyzing: "Analyzing image...",
    calculating_for: "Calculating for width",
    using_standard: "Using standard roll width",
    error_title: "Analysis failed",
    retry: "Retry",
    recalculate: "Recalculate",
    cancelled: "Analysis cancelled, image cleared",
    not_an_image: "Please upload an image file (JPEG, PNG, WEBP).",
    results_title: "Material consumption table",
    results_subtitle: "Approximate values estimated by AI from the photo",
    size: "Size",
    length: "Length",
    back: "back",
    chest: "Chest",
    half_girth: "half-girth",
    sleeve: "Sleeve",
    from_shoulder: "from shoulder",
    main: "Main",
    lining_fabric: "Lining",
    insulation: "Insulation",
    hardware: "Hardware",
    notes: "Notes",
    cost: "Cost",
    currency: "UAH",
    formula_title: "Formula",
    formula: "Materials (main + lining + insulation) + 15% of main and lining cost for hardware.",
    disclaimer: "Results are approximate. Enter prices to see the cost.",
    menu_hint: "[r]recalculate [t]retry [w]widths/prices [l]language [n]new photo [c]clear photo [s]save [q]quit",
    menu_prompt: "Action",
    image_prompt: "Path to jacket photo",
    image_cleared: "Image cleared",
    no_image: "No photo selected",
    saved_to: "Saved",
};

static RU: Texts = Texts {
    app_title: "Калькулятор расхода ткани",
    app_subtitle: "Загрузите фото куртки, чтобы получить расход материалов для размеров S–XXL",
    settings_title: "Параметры ткани",
    main_fabric: "Основная ткань",
    width: "Ширина рулона",
    price: "Цена за метр",
    cm: "см",
    info_text: "Если ширина не указана, ИИ использует стандартную ширину рулона (1.4–1.5 м).",
    analyzing: "Анализируем изображение...",
    calculating_for: "Расчёт для ширины",
    using_standard: "Используем стандартную ширину рулона",
    error_title: "Ошибка анализа",
    retry: "Повторить",
    recalculate: "Пересчитать",
    cancelled: "Анализ отменён, изображение убрано",
    not_an_image: "Пожалуйста, загрузите файл изображения (JPEG, PNG, WEBP).",
    results_title: "Таблица расхода материалов",
    results_subtitle: "Ориентировочные значения, рассчитанные ИИ по фото",
    size: "Размер",
    length: "Длина",
    back: "по спинке",
    chest: "Грудь",
    half_girth: "полуобхват",
    sleeve: "Рукав",
    from_shoulder: "от плеча",
    main: "Основная",
    lining_fabric: "Подкладка",
    insulation: "Утеплитель",
    hardware: "Фурнитура",
    notes: "Примечания",
    cost: "Стоимость",
    currency: "грн",
    formula_title: "Формула расчёта",
    formula: "Материалы (основная + подкладка + утеплитель) + 15% от стоимости основной ткани и подкладки на фурнитуру.",
    disclaimer: "Результаты ориентировочные. Укажите цены, чтобы увидеть стоимость.",
    menu_hint: "[r]пересчитать [t]повторить [w]ширина/цены [l]язык [n]новое фото [c]убрать фото [s]сохранить [q]выход",
    menu_prompt: "Действие",
    image_prompt: "Путь к фото куртки",
    image_cleared: "Изображение убрано",
    no_image: "Фото не выбрано",
    saved_to: "Сохранено",
};

/// Strings bundle for a language
pub fn texts(language: Language) -> &'static Texts {
    match language {
        Language::Uk => &UK,
        Language::En => &EN,
        Language::Ru => &RU,
    }
}
