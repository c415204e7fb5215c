/// Тариф для автомобиля, за час
pub const CAR_RATE_PER_HOUR: f64 = 1.5;

/// Тариф для мотоцикла, за час
pub const BIKE_RATE_PER_HOUR: f64 = 1.0;

/// Бесплатные первые полчаса (в часах)
pub const FREE_DURATION_HOURS: f64 = 0.5;

/// Скидка постоянного клиента: 5%
pub const RECURRING_USER_DISCOUNT: f64 = 0.05;

/// Сколько раз аллокатор перевыбирает место, если его CAS проиграл гонку
pub const CLAIM_RETRY_LIMIT: usize = 16;
