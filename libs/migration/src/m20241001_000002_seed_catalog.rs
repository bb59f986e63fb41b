use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Demo jewellery catalogue; safe to re-run
        manager
            .get_connection()
            .execute_unprepared(
                r#"
            INSERT INTO categories (name, status, created_at, updated_at)
            VALUES
                ('Necklaces', 'Active', NOW(), NOW()),
                ('Rings', 'Active', NOW(), NOW()),
                ('Earrings', 'Active', NOW(), NOW()),
                ('Bracelets', 'Active', NOW(), NOW())
            ON CONFLICT ((LOWER(name))) DO NOTHING
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(r#"
            INSERT INTO products (name, description, price, category_id, created_at, updated_at)
            SELECT v.name, v.description, v.price, c.id, NOW(), NOW()
            FROM (
                VALUES
                    ('Necklaces', 'Gold Pendant Necklace', 'A beautiful gold pendant necklace, perfect for any occasion.', 11599.00),
                    ('Necklaces', 'Silver Heart Necklace', 'A delicate silver heart necklace with intricate detailing.', 5399.00),
                    ('Necklaces', 'Diamond Necklace', 'A stunning diamond necklace, perfect for weddings or special events.', 28999.00),
                    ('Necklaces', 'Pearl Necklace', 'A classic pearl necklace with white pearls and gold clasp.', 7999.00),
                    ('Rings', 'Engagement Ring', 'A gorgeous engagement ring with a solitaire diamond in a platinum setting.', 45000.00),
                    ('Rings', 'Gold Band Ring', 'A simple yet elegant gold band ring, perfect for everyday wear.', 9500.00),
                    ('Rings', 'Silver Ring with Emerald', 'A beautiful silver ring featuring a vibrant emerald stone.', 14000.00),
                    ('Rings', 'Wedding Ring Set', 'A matching wedding ring set made from white gold, includes the bride and groom bands.', 40000.00),
                    ('Earrings', 'Diamond Stud Earrings', 'Elegant diamond stud earrings set in white gold.', 17500.00),
                    ('Earrings', 'Gold Hoop Earrings', 'Classic gold hoop earrings, a staple for every jewelry collection.', 3000.00),
                    ('Earrings', 'Pearl Drop Earrings', 'A pair of pearl drop earrings with a gold hook.', 5500.00),
                    ('Earrings', 'Chandelier Earrings', 'Stunning chandelier earrings with sparkling crystals.', 7999.00),
                    ('Bracelets', 'Gold Cuff Bracelet', 'A sleek and modern gold cuff bracelet for a minimalist look.', 8500.00),
                    ('Bracelets', 'Silver Charm Bracelet', 'A charm bracelet made of sterling silver with various customizable charms.', 5000.00),
                    ('Bracelets', 'Leather Wrap Bracelet', 'A stylish leather wrap bracelet with metal accents.', 2500.00),
                    ('Bracelets', 'Diamond Tennis Bracelet', 'A luxury diamond tennis bracelet set in white gold.', 50000.00)
            ) AS v(category, name, description, price)
            JOIN categories c ON c.name = v.category
            WHERE NOT EXISTS (
                SELECT 1 FROM products p WHERE p.category_id = c.id AND p.name = v.name
            )
            "#)
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Products go with their categories
        manager
            .get_connection()
            .execute_unprepared(
                "DELETE FROM categories WHERE name IN ('Necklaces', 'Rings', 'Earrings', 'Bracelets')",
            )
            .await?;

        Ok(())
    }
}
