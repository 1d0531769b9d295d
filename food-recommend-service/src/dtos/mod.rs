pub mod recommend;

pub use recommend::{
    ApiResponse, FoodHistoryEntry, FoodItem, MealSection, RecommendRequest, RecommendResult,
    UserProfile,
};
