use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Fixed instruction enforcing the output contract: exactly one JSON object
/// in the documented schema, null for anything not explicitly present in the
/// bill text, dates dd/mm/yyyy, numbers kept in their original format.
const SYSTEM_INSTRUCTION: &str = "\
Actuás como un modelo especializado en análisis automático de facturas de electricidad \
en Argentina. Tu única tarea es leer el texto plano extraído de una factura eléctrica \
(proporcionado por el usuario) y devolver un objeto JSON estandarizado, simple y útil \
para tareas básicas de análisis.\n\
\n\
REGLAS ESTRICTAS:\n\
- No inventar datos ni completar con suposiciones.\n\
- Si un dato no aparece explícitamente, devolver null.\n\
- Responder siempre exclusivamente con un JSON válido. Sin explicaciones, sin texto adicional.\n\
- Usar exactamente los nombres de campo definidos en el esquema.\n\
- Las fechas deben estar en formato dd/mm/yyyy.\n\
- Los valores numéricos deben conservar su formato tal como aparecen (por ejemplo: 1.234,56).\n\
\n\
FORMATO JSON DE RESPUESTA:\n\
{\n\
  \"customer_info\": {\n\
    \"customer_name\": \"\",\n\
    \"supply_address\": \"\",\n\
    \"tariff_type\": \"\"\n\
  },\n\
  \"billing_info\": {\n\
    \"issue_date\": \"\",\n\
    \"due_date\": \"\"\n\
  },\n\
  \"meter_readings\": {\n\
    \"consumed_kwh\": null\n\
  },\n\
  \"totals\": {\n\
    \"total_billed\": null\n\
  }\n\
}\n\
\n\
DETALLES:\n\
- tariff_type: solo permitir estos valores si aparecen: \"Residencial\", \"Comercial\", \"Industrial\".\n\
- consumed_kwh: debe provenir del texto, como \"Consumo facturado\" o similar.\n\
- total_billed: valor total a pagar, puede aparecer como \"Total a pagar\", \"Importe total\" o similar.\n\
- Si un campo está ausente en el texto, dejarlo como null, no lo calcules ni lo infieras.\n\
\n\
El usuario enviará el contenido extraído de la factura como texto plano. Devolvé \
únicamente el objeto JSON completo, según el esquema, con los valores extraídos.";

/// Seam for the field-extraction model call, so the handler can run against
/// mocks in tests and a structured-output backend can be swapped in later.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Send the reconstructed bill text to the model, returning its raw
    /// free-form reply.
    async fn extract_fields(&self, document: &str) -> anyhow::Result<String>;
}

/// Field extraction against the OpenAI chat-completions API.
pub struct OpenAiFieldExtractor {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiFieldExtractor {
    /// The key is injected here once at startup; the client enforces a
    /// request timeout so a hung upstream cannot wedge a request forever.
    pub fn new(api_key: String, model: String, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            http,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl FieldExtractor for OpenAiFieldExtractor {
    async fn extract_fields(&self, document: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_INSTRUCTION },
                { "role": "user", "content": document }
            ],
            "temperature": 1,
            "max_tokens": 2048,
            "top_p": 1
        });

        let response = self
            .http
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("model request failed")?;

        let status = response.status();
        let payload: serde_json::Value = response
            .json()
            .await
            .context("model response decode failed")?;

        if !status.is_success() {
            anyhow::bail!("model call failed with status {status}: {payload}");
        }

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("model response carried no message content: {payload}"))
    }
}
