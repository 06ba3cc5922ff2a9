//! Telegram deep-link building.
//!
//! Orders are fulfilled by a human operator over Telegram; the shop only
//! hands the customer (or admin) a prefilled message. Prices never appear in
//! these messages: pricing is negotiated in the chat itself.

use url::form_urlencoded;

use crate::domain::order::OrderWithLines;
use crate::domain::user::User;
use crate::dto::api::TelegramContactResponse;

fn encode(text: &str) -> String {
    form_urlencoded::byte_serialize(text.as_bytes()).collect()
}

/// Message a customer sends to the fulfillment operator after checkout.
pub fn customer_message(order: &OrderWithLines) -> String {
    let mut lines = vec![
        "Assalomu alaykum!".to_string(),
        format!("I placed order {}.", order.order.order_number),
        "Could you share prices and delivery terms?".to_string(),
        String::new(),
        "Order items:".to_string(),
    ];
    for line in &order.lines {
        lines.push(format!("{} ({})", line.product.name_uz, line.quantity));
    }
    lines.join("\n")
}

/// Message an admin sends to the customer about their order.
pub fn admin_message(order: &OrderWithLines, customer_name: &str) -> String {
    let mut lines = vec![
        format!("Assalomu alaykum, {customer_name}!"),
        format!("Buyurtmangiz {} bo'yicha.", order.order.order_number),
        String::new(),
        "Buyurtma tarkibi:".to_string(),
    ];
    for line in &order.lines {
        lines.push(format!(
            "• {} - {} kg",
            line.product.name_uz, line.quantity
        ));
    }
    lines.push(String::new());
    lines.push("Narx va yetkazib berish shartlari haqida ma'lumot bering, iltimos.".to_string());
    lines.join("\n")
}

/// Share-URL deep link opening Telegram with `text` prefilled.
pub fn share_link(text: &str) -> String {
    format!("https://t.me/share/url?url=&text={}", encode(text))
}

/// Direct chat link for a Telegram username or phone number.
pub fn chat_link(handle: &str) -> String {
    let cleaned: String = handle
        .chars()
        .filter(|c| !matches!(c, '+' | ' ' | '-' | '@'))
        .collect();
    format!("https://t.me/{cleaned}")
}

/// Contact card an admin uses to reach the customer who placed `order`.
pub fn contact_card(order: &OrderWithLines, customer: &User) -> TelegramContactResponse {
    let customer_name = customer.display_name().to_string();
    let message_text = admin_message(order, &customer_name);
    let customer_phone = customer
        .phone
        .clone()
        .filter(|phone| !phone.trim().is_empty());

    // With a phone on file the admin opens the chat directly; otherwise the
    // share link at least carries the prefilled message.
    let telegram_link = match &customer_phone {
        Some(phone) => chat_link(phone),
        None => share_link(&message_text),
    };

    TelegramContactResponse {
        customer_name,
        customer_phone,
        order_number: order.order.order_number.clone(),
        message_text,
        telegram_link,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::{Order, OrderLine, OrderStatus};
    use crate::domain::product::Product;
    use crate::domain::user::{Role, UserType};
    use chrono::Utc;

    fn sample_order() -> OrderWithLines {
        let now = Utc::now().naive_utc();
        OrderWithLines {
            order: Order {
                id: 1,
                user_id: 2,
                order_number: "#20250610-001".into(),
                status: OrderStatus::Received,
                created_at: now,
                updated_at: now,
            },
            lines: vec![OrderLine {
                product: Product {
                    id: 5,
                    name_uz: "Tovuq go'shti".into(),
                    name_ru: "Курица".into(),
                    category_id: 1,
                    supplier_id: 1,
                    image_url: None,
                    description: None,
                    status: true,
                    created_at: now,
                },
                quantity: 2.5,
            }],
        }
    }

    fn sample_customer() -> User {
        User {
            id: 2,
            username: "aziz".into(),
            email: None,
            role: Role::Customer,
            user_type: UserType::Individual,
            fio: Some("Aziz Karimov".into()),
            phone: Some("+998901234567".into()),
            address: None,
            company_name: None,
            inn: None,
            bank_details: None,
            legal_address: None,
            responsible_person: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn customer_message_lists_items_without_prices() {
        let text = customer_message(&sample_order());
        assert!(text.contains("#20250610-001"));
        assert!(text.contains("Tovuq go'shti (2.5)"));
        assert!(!text.to_lowercase().contains("price:"));
    }

    #[test]
    fn share_link_is_url_encoded() {
        let link = share_link("salom dunyo\nnew line");
        assert!(link.starts_with("https://t.me/share/url?url=&text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('\n'));
    }

    #[test]
    fn contact_card_uses_phone_when_present() {
        let card = contact_card(&sample_order(), &sample_customer());
        assert_eq!(card.telegram_link, "https://t.me/998901234567");
        assert_eq!(card.customer_name, "Aziz Karimov");
        assert!(card.message_text.contains("• Tovuq go'shti - 2.5 kg"));
    }

    #[test]
    fn contact_card_falls_back_to_share_link() {
        let mut customer = sample_customer();
        customer.phone = None;
        let card = contact_card(&sample_order(), &customer);
        assert!(card.telegram_link.starts_with("https://t.me/share/url?"));
        assert_eq!(card.customer_phone, None);
    }
}
