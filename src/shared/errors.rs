//! Error handling for the application

use thiserror::Error;

use crate::shared::i18n::{Catalog, Localizer};

/// Configuration errors. Always fatal, raised before any network call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Required field is missing or empty: {0}")]
    MissingField(String),

    #[error("No valid items found in '{0}'")]
    NoValidItems(String),

    #[error("Cache lifetime must be between 1 and 1439 minutes, got {0}")]
    InvalidTtl(u32),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown source kind: {0}")]
    UnknownSource(String),
}

/// Per-item lookup errors. Recovered locally: the item is skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Unexpected HTTP status: {0}")]
    Status(u16),

    #[error("Empty response body")]
    EmptyBody,

    #[error("Malformed payload: {0}")]
    Malformed(String),

    #[error("No lookup match for {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

/// Cache store errors. Never fatal: a failing store degrades to a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache payload could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Batch-level errors surfaced to the caller of `fetch_events`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Upstream unavailable for {source_name}: {reason}")]
    UpstreamUnavailable { source_name: String, reason: String },
}

static CONFIG_PREFIX: Catalog = &[
    ("en", "Configuration error"),
    ("zh", "配置错误"),
    ("ja", "設定エラー"),
    ("ko", "구성 오류"),
    ("de", "Konfigurationsfehler"),
    ("es", "Error de configuración"),
    ("fr", "Erreur de configuration"),
    ("pt", "Erro de configuração"),
    ("ru", "Ошибка конфигурации"),
];

static NO_VALID_ITEMS: Catalog = &[
    ("en", "No valid item data found. Please check the input format. Example: 12345_us_68.00"),
    ("zh", "没有有效的数据。请检查输入格式。示例: 12345_us_68.00"),
    ("ja", "有効なデータが見つかりません。入力形式を確認してください。例: 12345_us_68.00"),
    ("ko", "유효한 데이터를 찾을 수 없습니다. 입력 형식을 확인하세요. 예: 12345_us_68.00"),
    ("de", "Keine gültigen Daten gefunden. Bitte überprüfen Sie das Eingabeformat. Beispiel: 12345_us_68.00"),
    ("es", "No se encontraron datos válidos. Por favor, verifique el formato. Ejemplo: 12345_us_68.00"),
    ("fr", "Aucune donnée valide trouvée. Veuillez vérifier le format. Exemple: 12345_us_68.00"),
    ("pt", "Nenhum dado válido encontrado. Por favor, verifique o formato. Exemplo: 12345_us_68.00"),
    ("ru", "Действительные данные не найдены. Пожалуйста, проверьте формат. Пример: 12345_us_68.00"),
];

static MISSING_ITEMS: Catalog = &[
    ("en", "Item data cannot be empty. Format: 12345_us_68.00,2736473_cn_38.00"),
    ("zh", "数据不能为空。格式: 12345_us_68.00,2736473_cn_38.00"),
    ("ja", "データを空にすることはできません。形式: 12345_us_68.00,2736473_cn_38.00"),
    ("ko", "데이터는 비워둘 수 없습니다. 형식: 12345_us_68.00,2736473_cn_38.00"),
    ("de", "Daten dürfen nicht leer sein. Format: 12345_us_68.00,2736473_cn_38.00"),
    ("es", "Los datos no pueden estar vacíos. Formato: 12345_us_68.00,2736473_cn_38.00"),
    ("fr", "Les données ne peuvent pas être vides. Format: 12345_us_68.00,2736473_cn_38.00"),
    ("pt", "Os dados não podem estar vazios. Formato: 12345_us_68.00,2736473_cn_38.00"),
    ("ru", "Данные не могут быть пустыми. Формат: 12345_us_68.00,2736473_cn_38.00"),
];

static UPSTREAM_PREFIX: Catalog = &[
    ("en", "Unable to retrieve price information, please check your network connection"),
    ("zh", "无法获取价格信息，请检查网络连接"),
    ("ja", "価格情報を取得できません。ネットワーク接続を確認してください"),
    ("ko", "가격 정보를 가져올 수 없습니다. 네트워크 연결을 확인하세요"),
    ("de", "Preisinformationen können nicht abgerufen werden. Bitte überprüfen Sie Ihre Netzwerkverbindung"),
    ("es", "No se puede obtener la información de precios. Por favor, verifique su conexión de red"),
    ("fr", "Impossible de récupérer les informations de prix. Veuillez vérifier votre connexion réseau"),
    ("pt", "Não foi possível obter as informações de preço. Por favor, verifique sua conexão de rede"),
    ("ru", "Не удалось получить информацию о ценах. Пожалуйста, проверьте подключение к сети"),
];

impl PipelineError {
    /// Single user-facing message in the localizer's language.
    pub fn localized(&self, localizer: &dyn Localizer) -> String {
        match self {
            PipelineError::Configuration(ConfigError::NoValidItems(_)) => {
                localizer.localize(NO_VALID_ITEMS)
            }
            PipelineError::Configuration(ConfigError::MissingField(field)) if field == "items" => {
                localizer.localize(MISSING_ITEMS)
            }
            PipelineError::Configuration(err) => {
                format!("{}: {}", localizer.localize(CONFIG_PREFIX), err)
            }
            PipelineError::UpstreamUnavailable { source_name, reason } => {
                format!("{} ({}: {})", localizer.localize(UPSTREAM_PREFIX), source_name, reason)
            }
        }
    }
}

/// Startup failure outside the pipeline
#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::i18n::StaticLocalizer;

    #[test]
    fn test_no_valid_items_is_localized() {
        let err = PipelineError::from(ConfigError::NoValidItems("123_us".to_string()));

        let en = err.localized(&StaticLocalizer::new("en"));
        assert!(en.starts_with("No valid item data found"));

        let zh = err.localized(&StaticLocalizer::new("zh"));
        assert!(zh.starts_with("没有有效的数据"));
    }

    #[test]
    fn test_upstream_message_names_source() {
        let err = PipelineError::UpstreamUnavailable {
            source_name: "nintendo".to_string(),
            reason: "HTTP 503".to_string(),
        };

        let msg = err.localized(&StaticLocalizer::new("xx"));
        assert!(msg.starts_with("Unable to retrieve price information"));
        assert!(msg.contains("nintendo: HTTP 503"));
    }

    #[test]
    fn test_app_error_message() {
        let err = AppError::HttpClient("no TLS backend".to_string());
        assert_eq!(err.to_string(), "HTTP client setup failed: no TLS backend");
    }
}
