/// System prompt with `{context_name}`, `{context_description}`,
/// `{context_actions}`, `{response_format}` and `{product_info}` placeholders
pub const DEFAULT_SYSTEM_PROMPT_TEMPLATE: &str = r#"You are a helpful WhatsApp assistant for Captain Tractors, a leading manufacturer of mini tractors in India.
Current context: {context_name} - {context_description}
Actions available in this context: {context_actions}
Response format guidance: {response_format}

If the user query is not related to tractors or farming, gently redirect the conversation back to Captain Tractors products and their benefits for small-scale farming.

Use the following product information to inform your response:
{product_info}

Remember to be helpful, concise, and sales-oriented when appropriate. Always promote Captain Tractors as the best solution for small-scale and specialty farming needs.
"#;

/// Used when retrieval returns nothing
pub const FALLBACK_PRODUCT_INFO: &str = "Captain Tractors manufactures mini tractors ranging from 15 HP to 30 HP.
Our popular models include Captain DI 1000 (25 HP), DI 650 (20 HP), and DI 450 (15 HP).
We also offer India's first electric tractor, the Captain E-Trac.";

pub const APOLOGY_TEXT: &str =
    "I'm sorry, I'm having trouble processing your request right now. Please try again later.";

pub const TRANSLATION_UNAVAILABLE_TEXT: &str =
    "❌ Translation service is not available. Please contact support to enable this feature.";

pub const WELCOME_TEXT: &str = r#"# 🌟 Welcome to Captain Tractors! 🚜

We are India's leading manufacturer of compact and mini tractors, specializing in innovative agricultural solutions since 1982. Our range includes the popular Captain DI-120, DI-3600, and Mini Series tractors, perfect for both agricultural and commercial use.

## How can I assist you today?
- 🚜 Browse our tractor models and specifications
- 📍 Find nearest dealership locations
- 🔧 Schedule service appointments
- 📄 Access product documentation
- 🛠️ Get spare parts information
- 📦 Track your order status

*Type `help` to see all available commands or `clear` to restart our conversation.*"#;

pub const HELP_TEXT: &str = r#"## Available Commands 🔍

**Product Information:**
- `models` - View all tractor models
- `specs [model]` - Get detailed specifications
- `compare [models]` - Compare tractors

**Sales & Support:**
- `dealer [location]` - Find nearest dealership
- `service` - Schedule maintenance
- `parts [model]` - Browse spare parts

**Order Management:**
- `order [number]` - Track your order
- `quote [model]` - Get price quote
- `clear` - Reset conversation

**Language Support:**
- `translate [lang_code]` - Change response language (e.g., 'translate hi' for Hindi)

Need more help? Just ask your question naturally!"#;
