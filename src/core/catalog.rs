//! # Site Catalog
//!
//! Everything the site shows: sections, hero copy, statistics, features,
//! portfolio, FAQ, priced services, glossary and the about card.
//!
//! A built-in catalog is compiled in. A TOML file with the same shape can
//! replace it (see `content_file` in the config); any table left out of the
//! file falls back to the built-in one.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::core::glossary;
use crate::core::navigation::NavError;
use crate::core::order::SelectedService;
use crate::core::section::{self, Section, SectionId, SectionTable};

#[derive(Debug)]
pub enum CatalogError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(NavError),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Io(e) => write!(f, "catalog I/O error: {e}"),
            CatalogError::Parse(e) => write!(f, "catalog parse error: {e}"),
            CatalogError::Invalid(e) => write!(f, "catalog is invalid: {e}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    pub title: String,
    pub tagline: String,
    /// May mark glossary terms as `{Term}`.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub target: u64,
    #[serde(default)]
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub key: String,
    pub title: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioItem {
    pub title: String,
    pub category: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCard {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub summary: String,
    #[serde(default)]
    pub includes: Vec<String>,
}

impl ServiceCard {
    pub fn selection(&self) -> SelectedService {
        SelectedService {
            id: self.id.clone(),
            price: self.price,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutCard {
    pub name: String,
    pub role: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub home: SectionId,
    pub default_title: String,
    pub sections: Vec<Section>,
    pub hero: Hero,
    pub stats: Vec<Stat>,
    pub features: Vec<Feature>,
    pub portfolio: Vec<PortfolioItem>,
    pub faq: Vec<FaqEntry>,
    pub services: Vec<ServiceCard>,
    pub glossary: BTreeMap<String, String>,
    pub about: Option<AboutCard>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::stratum()
    }
}

impl Catalog {
    pub fn section_table(&self) -> Result<SectionTable, NavError> {
        SectionTable::new(
            self.sections.clone(),
            self.home.clone(),
            self.default_title.clone(),
        )
    }

    pub fn glossary(&self) -> glossary::Glossary {
        glossary::Glossary::new(self.glossary.clone())
    }

    pub fn from_toml(contents: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(contents).map_err(CatalogError::Parse)?;
        catalog.section_table().map_err(CatalogError::Invalid)?;
        Ok(catalog)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(CatalogError::Io)?;
        let catalog = Self::from_toml(&contents)?;
        info!(
            "Loaded catalog from {} ({} services, {} FAQ entries)",
            path.display(),
            catalog.services.len(),
            catalog.faq.len()
        );
        Ok(catalog)
    }

    /// The built-in STRATUM site.
    pub fn stratum() -> Self {
        Self {
            home: SectionId::new(section::HOME),
            default_title: section::DEFAULT_TITLE.to_string(),
            sections: section::builtin_sections(),
            hero: Hero {
                title: "STRATUM".into(),
                tagline: "Боты и {Mini Apps} для бизнеса в Telegram".into(),
                text: "Проектируем, разрабатываем и поддерживаем. От {MVP} за две недели \
                       до интеграции с вашей {CRM} и {ERP}."
                    .into(),
            },
            stats: vec![
                Stat { label: "проектов запущено".into(), target: 120, suffix: "+".into() },
                Stat { label: "клиентов вернулись снова".into(), target: 85, suffix: "%".into() },
                Stat { label: "лет в разработке".into(), target: 6, suffix: String::new() },
            ],
            features: vec![
                Feature {
                    key: "bots".into(),
                    title: "Боты с памятью".into(),
                    summary: "Диалоги на {FSM}: бот помнит, где остановился клиент.".into(),
                },
                Feature {
                    key: "mini_apps".into(),
                    title: "Mini Apps".into(),
                    summary: "Витрины, записи и личные кабинеты прямо в Telegram.".into(),
                },
                Feature {
                    key: "integrations".into(),
                    title: "Интеграции".into(),
                    summary: "Подключаем {CRM}, {ERP}, платёжные системы и любые {API}.".into(),
                },
            ],
            portfolio: vec![
                PortfolioItem {
                    title: "Запись в барбершоп".into(),
                    category: "Telegram-бот".into(),
                    summary: "Онлайн-запись, напоминания и оплата. Нагрузка на администратора упала вдвое.".into(),
                },
                PortfolioItem {
                    title: "Каталог цветочного магазина".into(),
                    category: "Mini App".into(),
                    summary: "Витрина с корзиной и доставкой, заказы сразу попадают в {CRM}.".into(),
                },
                PortfolioItem {
                    title: "Обменник для фрилансеров".into(),
                    category: "Бот + интеграция".into(),
                    summary: "Приём платежей в {USDT} с автоматической сверкой курса.".into(),
                },
                PortfolioItem {
                    title: "Учёт склада".into(),
                    category: "Интеграция".into(),
                    summary: "Синхронизация остатков между ботом и {ERP} каждые пять минут.".into(),
                },
            ],
            faq: vec![
                FaqEntry {
                    question: "Сколько времени занимает разработка?".into(),
                    answer: "Простой бот — от 5 дней. {MVP} Mini App — 2–3 недели. Сроки фиксируем в договоре.".into(),
                },
                FaqEntry {
                    question: "Можно ли подключить мою CRM?".into(),
                    answer: "Да. Работаем с популярными {CRM} через {API}, а для самописных систем делаем свой коннектор.".into(),
                },
                FaqEntry {
                    question: "Как происходит оплата?".into(),
                    answer: "50 % предоплата, остаток после сдачи. Принимаем рубли, карты и {USDT}.".into(),
                },
                FaqEntry {
                    question: "Что будет после запуска?".into(),
                    answer: "Месяц бесплатной поддержки, затем — по подписке или разовыми задачами.".into(),
                },
            ],
            services: vec![
                ServiceCard {
                    id: "bot".into(),
                    name: "Telegram-бот".into(),
                    price: 15000,
                    summary: "Бот-визитка, запись или приём заявок со сценарием на {FSM}.".into(),
                    includes: vec!["До 10 экранов диалога".into(), "Админ-уведомления".into(), "Неделя поддержки".into()],
                },
                ServiceCard {
                    id: "mini_app".into(),
                    name: "Mini App".into(),
                    price: 45000,
                    summary: "Полноценное приложение внутри Telegram: каталог, корзина, личный кабинет.".into(),
                    includes: vec!["Дизайн под бренд".into(), "Оплата внутри приложения".into(), "Месяц поддержки".into()],
                },
                ServiceCard {
                    id: "integration".into(),
                    name: "Интеграция с CRM".into(),
                    price: 30000,
                    summary: "Связываем бота с {CRM} или {ERP} через {API}.".into(),
                    includes: vec!["Двусторонняя синхронизация".into(), "Логи и алерты".into()],
                },
                ServiceCard {
                    id: "mvp".into(),
                    name: "MVP под ключ".into(),
                    price: 120000,
                    summary: "От идеи до запуска {MVP}: аналитика, прототип, разработка, релиз.".into(),
                    includes: vec!["Бот и Mini App".into(), "Интеграции".into(), "Три месяца поддержки".into()],
                },
            ],
            glossary: glossary::builtin_entries(),
            about: Some(AboutCard {
                name: "Команда STRATUM".into(),
                role: "Разработка ботов и Mini Apps".into(),
                bio: "Небольшая команда из трёх разработчиков и дизайнера. Пишем код, который \
                      не стыдно передать другой команде."
                    .into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = Catalog::stratum();
        let table = catalog.section_table().unwrap();
        assert_eq!(table.home(), section::HOME);
        assert_eq!(catalog.services.len(), 4);
        assert_eq!(catalog.glossary().len(), 7);
    }

    #[test]
    fn test_builtin_text_terms_are_defined() {
        let catalog = Catalog::stratum();
        let glossary = catalog.glossary();
        let texts = catalog
            .faq
            .iter()
            .map(|f| f.answer.as_str())
            .chain(catalog.services.iter().map(|s| s.summary.as_str()))
            .chain(catalog.portfolio.iter().map(|p| p.summary.as_str()))
            .chain(catalog.features.iter().map(|f| f.summary.as_str()))
            .chain([catalog.hero.text.as_str(), catalog.hero.tagline.as_str()]);
        for text in texts {
            for term in glossary::marked_terms(text) {
                assert_ne!(glossary.define(term, None), glossary::PENDING_DEFINITION, "{term}");
            }
        }
    }

    #[test]
    fn test_sparse_toml_falls_back_to_builtin() {
        let toml_str = r#"
[[services]]
id = "audit"
name = "Аудит бота"
price = 5000
summary = "Разбор сценариев"
"#;
        let catalog = Catalog::from_toml(toml_str).unwrap();
        assert_eq!(catalog.services.len(), 1);
        assert_eq!(catalog.services[0].selection().price, 5000);
        assert!(catalog.services[0].includes.is_empty());
        assert_eq!(catalog.faq, Catalog::stratum().faq);
    }

    #[test]
    fn test_invalid_section_table_rejected() {
        let toml_str = r#"
home = "landing"
"#;
        let err = Catalog::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[about]\nname = \"Иван\"\nrole = \"Dev\"\nbio = \"Пишу ботов\"").unwrap();
        let catalog = Catalog::load(file.path()).unwrap();
        assert_eq!(catalog.about.unwrap().name, "Иван");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }
}
