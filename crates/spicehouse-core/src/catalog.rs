//! # Product Catalog
//!
//! The storefront's product content: a small static catalog of South
//! Indian spice blends with slug lookup and size-variant pricing.
//!
//! ## Pricing Model
//! Each product carries one full-size price; the trial pack is priced at
//! half of it. Lines carry a frozen copy of whichever price applied when
//! the shopper added them, so catalog edits never reprice a live cart.

use crate::cart::CartLine;
use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ProductSize;

// =============================================================================
// Product
// =============================================================================

/// A product available in the storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Identifier and URL slug (the storefront uses the same value).
    pub id: &'static str,
    pub slug: &'static str,

    /// Display name shown in listings and on cart lines.
    pub name: &'static str,

    /// Short listing description.
    pub description: &'static str,

    /// Region of origin, shown on the product page.
    pub region: &'static str,

    /// Image reference for product and cart display.
    pub image: &'static str,

    /// Full-size price in cents.
    pub full_price_cents: i64,
}

impl Product {
    /// Full-size price as Money.
    #[inline]
    pub fn full_price(&self) -> Money {
        Money::from_cents(self.full_price_cents)
    }

    /// Trial-pack price: half the full-size price.
    #[inline]
    pub fn trial_price(&self) -> Money {
        Money::from_cents(self.full_price_cents / 2)
    }

    /// Price for the given size variant.
    pub fn price_for(&self, size: ProductSize) -> Money {
        match size {
            ProductSize::Trial => self.trial_price(),
            ProductSize::Full => self.full_price(),
        }
    }

    /// Builds a cart line for this product, freezing the current price.
    ///
    /// Caller contract: `quantity >= 1` (enforced at the store boundary).
    pub fn cart_line(&self, size: ProductSize, quantity: i64) -> CartLine {
        CartLine {
            product_id: self.id.to_string(),
            name: self.name.to_string(),
            unit_price_cents: self.price_for(size).cents(),
            image: self.image.to_string(),
            size,
            quantity,
        }
    }
}

// =============================================================================
// Catalog Data
// =============================================================================

/// The storefront catalog, in display order.
static PRODUCTS: &[Product] = &[
    Product {
        id: "rasam-powder",
        slug: "rasam-powder",
        name: "Rasam Powder (saarina pudi)",
        description: "An aromatic blend for the quintessential South Indian \
                      soup, balancing tartness with heat and spice.",
        region: "Tamil Nadu",
        image: "/images/products/rasam-powder.jpg",
        full_price_cents: 999,
    },
    Product {
        id: "sambar-powder",
        slug: "sambar-powder",
        name: "Sambar Powder (huli pudi)",
        description: "A rich, complex spice mix essential for the hearty \
                      lentil and vegetable stew beloved across South India.",
        region: "Karnataka",
        image: "/images/products/sambar-powder.jpg",
        full_price_cents: 999,
    },
    Product {
        id: "groundnut-chutney-powder",
        slug: "groundnut-chutney-powder",
        name: "Groundnut Chutney Powder (with garlic)",
        description: "Roasted groundnuts, dried chillies, and garlic ground \
                      into a versatile table condiment.",
        region: "Andhra Pradesh",
        image: "/images/products/groundnut-chutney-powder.jpg",
        full_price_cents: 899,
    },
    Product {
        id: "bisi-bele-bath-powder",
        slug: "bisi-bele-bath-powder",
        name: "Bisibele-bath Powder",
        description: "The signature masala for Karnataka's festive rice, \
                      lentil, and vegetable one-pot dish.",
        region: "Karnataka",
        image: "/images/products/bisi-bele-bath-powder.jpg",
        full_price_cents: 1099,
    },
    Product {
        id: "curry-leaf-powder",
        slug: "curry-leaf-powder",
        name: "Curry Leaf Powder (karivepaku podi)",
        description: "Sun-dried curry leaves blended with dals and red \
                      chillies; stir into hot rice with ghee.",
        region: "Andhra Pradesh",
        image: "/images/products/curry-leaf-powder.jpg",
        full_price_cents: 849,
    },
    Product {
        id: "idli-chilli-powder",
        slug: "idli-chilli-powder",
        name: "Idli Chilli Powder (milagai podi)",
        description: "The classic fiery accompaniment for idli and dosa, \
                      with sesame and roasted dals.",
        region: "Tamil Nadu",
        image: "/images/products/idli-chilli-powder.jpg",
        full_price_cents: 799,
    },
];

// =============================================================================
// Lookup
// =============================================================================

/// All products in display order.
pub fn all() -> &'static [Product] {
    PRODUCTS
}

/// Finds a product by its URL slug.
pub fn find_by_slug(slug: &str) -> Option<&'static Product> {
    PRODUCTS.iter().find(|p| p.slug == slug)
}

/// Finds a product by slug, failing with a not-found error.
///
/// The error carries the slug so the shell can render a "product not
/// found" message rather than crashing on an unknown URL.
pub fn get_by_slug(slug: &str) -> CoreResult<&'static Product> {
    find_by_slug(slug).ok_or_else(|| CoreError::ProductNotFound(slug.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
