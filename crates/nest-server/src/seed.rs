//! Sample catalog data and an administrator account.
//!
//! Every record is looked up by slug (or username) first, so running the
//! seed twice leaves the database unchanged.

use anyhow::{Context, Result};
use nest_auth::{AccountStore, RegisterRequest, Role};
use nest_commerce::catalog::{AuthorDraft, BookDraft, CategoryDraft, Language, PublisherDraft};
use nest_commerce::store::Store;
use nest_commerce::{CommerceError, Money};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@booknest.uz";
/// Used when neither `--admin-password` nor `BOOKNEST_ADMIN_PASSWORD` is set.
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// What one seed run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub categories: usize,
    pub authors: usize,
    pub publishers: usize,
    pub books: usize,
    pub admin_created: bool,
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

const CATEGORIES: &[(&str, &str, &str, &str)] = &[
    ("Klassik adabiyot", "klassik", "fa-book-open", "O'zbek va jahon klassik asarlari"),
    ("Zamonaviy adabiyot", "zamonaviy", "fa-star", "Hozirgi zamon yozuvchilarining asarlari"),
    ("Yoshlar adabiyoti", "yoshlar", "fa-child", "Bolalar va yoshlar uchun kitoblar"),
    ("Ilmiy-ommabop", "ilmiy", "fa-flask", "Fan va texnologiya bo'yicha kitoblar"),
    ("Biznes va iqtisod", "biznes", "fa-chart-line", "Biznes, marketing va moliya"),
    ("Dasturlash", "dasturlash", "fa-code", "Dasturlash va IT texnologiyalari"),
];

const AUTHORS: &[(&str, &str, &str, &str)] = &[
    ("Abdulla Qodiriy", "abdulla-qodiriy", "O'zbek adabiyotining asoschisi, yirik yozuvchi", "O'zbekiston"),
    ("Alisher Navoiy", "alisher-navoiy", "Buyuk o'zbek shoiri va mutafakkiri", "O'zbekiston"),
    ("Murod Muhammad Do'st", "murod-muhammad-dost", "Zamonaviy o'zbek yozuvchisi", "O'zbekiston"),
    ("Said Ahmad", "said-ahmad", "Yozuvchi, publitsist", "O'zbekiston"),
    ("Napoleon Hill", "napoleon-hill", "Amerikalik muallif va motivatsion ma'ruzachi", "AQSH"),
    ("Dale Carnegie", "dale-carnegie", "Amerikalik yozuvchi va o'qituvchi", "AQSH"),
];

const PUBLISHERS: &[(&str, &str)] = &[
    ("O'zbekiston", "ozbekiston"),
    ("Sharq", "sharq"),
    ("Yangi asr avlodi", "yangi-asr"),
    ("Tafakkur", "tafakkur"),
];

struct SampleBook {
    title: &'static str,
    slug: &'static str,
    author: &'static str,
    category: &'static str,
    publisher: &'static str,
    description: &'static str,
    price: f64,
    discount_price: f64,
    stock: i64,
    pages: i64,
    year: i64,
    featured: bool,
    bestseller: bool,
}

const BOOKS: &[SampleBook] = &[
    SampleBook {
        title: "O'tgan kunlar",
        slug: "otgan-kunlar",
        author: "abdulla-qodiriy",
        category: "klassik",
        publisher: "ozbekiston",
        description: "O'zbek adabiyotining ilk romani. O'tgan davr hayotidan lavhalar.",
        price: 45000.0,
        discount_price: 40000.0,
        stock: 50,
        pages: 384,
        year: 1926,
        featured: true,
        bestseller: true,
    },
    SampleBook {
        title: "Xamsa",
        slug: "xamsa",
        author: "alisher-navoiy",
        category: "klassik",
        publisher: "sharq",
        description: "Alisher Navoiyning besh dostoni to'plami.",
        price: 75000.0,
        discount_price: 65000.0,
        stock: 30,
        pages: 640,
        year: 1485,
        featured: true,
        bestseller: true,
    },
    SampleBook {
        title: "Yer yuzidagi eng chiroyli yer",
        slug: "yer-yuzidagi-eng-chiroyli-yer",
        author: "murod-muhammad-dost",
        category: "zamonaviy",
        publisher: "yangi-asr",
        description: "Zamonaviy o'zbek adabiyotidan asar. Vatan muhabbati haqida.",
        price: 42000.0,
        discount_price: 38000.0,
        stock: 75,
        pages: 320,
        year: 2015,
        featured: true,
        bestseller: false,
    },
    SampleBook {
        title: "Baxtli kunlar",
        slug: "baxtli-kunlar",
        author: "said-ahmad",
        category: "yoshlar",
        publisher: "tafakkur",
        description: "Yoshlar uchun roman. Hayot va muhabbat haqida.",
        price: 35000.0,
        discount_price: 30000.0,
        stock: 100,
        pages: 256,
        year: 2018,
        featured: false,
        bestseller: false,
    },
    SampleBook {
        title: "O'ylab ko'ring va boy bo'ling",
        slug: "oylab-koring-va-boy-boling",
        author: "napoleon-hill",
        category: "biznes",
        publisher: "tafakkur",
        description: "Shaxsiy rivojlanish bo'yicha mashhur kitob.",
        price: 55000.0,
        discount_price: 48000.0,
        stock: 60,
        pages: 304,
        year: 1937,
        featured: true,
        bestseller: true,
    },
    SampleBook {
        title: "Do'stlarni qanday orttiramiz",
        slug: "dostlarni-qanday-orttiramiz",
        author: "dale-carnegie",
        category: "biznes",
        publisher: "tafakkur",
        description: "Muloqot san'ati haqida kitob.",
        price: 48000.0,
        discount_price: 42000.0,
        stock: 80,
        pages: 288,
        year: 1936,
        featured: true,
        bestseller: true,
    },
];

/// Return the existing record, or create it when the lookup reports it
/// missing. The flag says whether a record was created.
fn get_or_create<T>(
    find: impl FnOnce() -> Result<T, CommerceError>,
    create: impl FnOnce() -> Result<T, CommerceError>,
) -> Result<(T, bool), CommerceError> {
    match find() {
        Ok(existing) => Ok((existing, false)),
        Err(e) if e.is_not_found() => Ok((create()?, true)),
        Err(e) => Err(e),
    }
}

/// Insert the sample catalog and the admin account where missing.
pub fn seed(store: &Store, accounts: &AccountStore, admin_password: &str) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    let currency = store.settings().currency;

    for &(name, slug, icon, description) in CATEGORIES {
        let draft = CategoryDraft {
            name: name.to_string(),
            slug: Some(slug.to_string()),
            description: description.to_string(),
            icon: Some(icon.to_string()),
            ..CategoryDraft::default()
        };
        let (_, created) = get_or_create(|| store.category_by_slug(slug), || store.create_category(&draft))
            .with_context(|| format!("seeding category {}", slug))?;
        report.categories += usize::from(created);
    }

    for &(name, slug, bio, nationality) in AUTHORS {
        let draft = AuthorDraft {
            name: name.to_string(),
            slug: Some(slug.to_string()),
            bio: bio.to_string(),
            nationality: Some(nationality.to_string()),
            ..AuthorDraft::default()
        };
        let (_, created) = get_or_create(|| store.author_by_slug(slug), || store.create_author(&draft))
            .with_context(|| format!("seeding author {}", slug))?;
        report.authors += usize::from(created);
    }

    for &(name, slug) in PUBLISHERS {
        let draft = PublisherDraft {
            name: name.to_string(),
            slug: Some(slug.to_string()),
            ..PublisherDraft::default()
        };
        let (_, created) = get_or_create(|| store.publisher_by_slug(slug), || store.create_publisher(&draft))
            .with_context(|| format!("seeding publisher {}", slug))?;
        report.publishers += usize::from(created);
    }

    for sample in BOOKS {
        let created = seed_book(store, sample, currency)
            .with_context(|| format!("seeding book {}", sample.slug))?;
        report.books += usize::from(created);
    }

    if accounts.find_by_username(ADMIN_USERNAME)?.is_none() {
        let request = RegisterRequest::new(ADMIN_USERNAME, ADMIN_EMAIL, admin_password);
        accounts
            .create_user(&request, Role::Admin)
            .context("creating admin account")?;
        report.admin_created = true;
    }

    tracing::info!(
        categories = report.categories,
        authors = report.authors,
        publishers = report.publishers,
        books = report.books,
        admin_created = report.admin_created,
        "seed finished"
    );
    Ok(report)
}

fn seed_book(store: &Store, sample: &SampleBook, currency: nest_commerce::Currency) -> Result<bool, CommerceError> {
    let author = store.author_by_slug(sample.author)?;
    let category = store.category_by_slug(sample.category)?;
    let publisher = store.publisher_by_slug(sample.publisher)?;

    let draft = BookDraft {
        slug: Some(sample.slug.to_string()),
        description: sample.description.to_string(),
        publisher_id: Some(publisher.id),
        discount_price_cents: Some(Money::from_decimal(sample.discount_price, currency).amount_cents),
        pages: Some(sample.pages),
        language: Language::Uzbek,
        publication_year: Some(sample.year),
        is_featured: sample.featured,
        is_bestseller: sample.bestseller,
        ..BookDraft::new(
            sample.title,
            Money::from_decimal(sample.price, currency).amount_cents,
            sample.stock,
        )
        .with_author(author.id)
        .with_category(category.id)
    };
    let (_, created) = get_or_create(|| store.book_by_slug(sample.slug), || store.create_book(&draft))?;
    Ok(created)
}
