//! Route table and role-gated guards.
//! Pattern matching over the browser routes plus the guard decision logic:
//! protected views render a placeholder while session/role state resolves,
//! then either render, redirect to sign-in (preserving the requested
//! location), or bounce role mismatches to the dashboard with a forbidden
//! notice that is suppressed on the redirect's own re-entry.

use std::collections::HashMap;

use crate::identity::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteId {
    Home,
    PetListing,
    PetDetails,
    DonationCampaigns,
    DonationDetails,
    Login,
    Register,
    DashboardOverview,
    AddPet,
    MyAddedPets,
    UpdatePet,
    CreateCampaign,
    EditCampaign,
    MyCampaigns,
    MyDonations,
    AdoptionRequests,
    AdminUsers,
    AdminAllPets,
    AdminAllDonations,
    InternalError,
}

pub struct Route {
    pub id: RouteId,
    pub pattern: &'static str,
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub id: RouteId,
    pub access: Access,
    pub params: HashMap<String, String>,
}

/// Navigation state carried across a redirect, mirroring the router's
/// location state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavState {
    /// Set on the redirect a failed admin gate issues; suppresses the
    /// forbidden notice when the gate re-evaluates during that redirect.
    pub from_admin_redirect: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Session or role resolution still pending: render a placeholder, do
    /// not redirect yet.
    Pending,
    Render(RouteMatch),
    /// No session on a protected route; `from` is restored after login.
    RedirectToLogin { from: String },
    /// Session present but the required role is absent.
    RedirectToDashboard { forbidden_notice: bool },
    /// Unmatched path: the generic error view.
    NotFound,
}

pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::platform()
    }
}

impl RouteTable {
    /// The platform's route set.
    pub fn platform() -> Self {
        use Access::*;
        use RouteId::*;
        Self {
            routes: vec![
                Route { id: Home, pattern: "/", access: Public },
                Route { id: PetListing, pattern: "/pet-listing", access: Public },
                Route { id: PetDetails, pattern: "/pets/:id", access: Public },
                Route { id: DonationCampaigns, pattern: "/donation-campaigns", access: Public },
                Route { id: DonationDetails, pattern: "/donations/:id", access: Public },
                Route { id: Login, pattern: "/login", access: Public },
                Route { id: Register, pattern: "/register", access: Public },
                Route { id: DashboardOverview, pattern: "/dashboard", access: Authenticated },
                Route { id: AddPet, pattern: "/dashboard/add-pet", access: Authenticated },
                Route { id: MyAddedPets, pattern: "/dashboard/my-added-pets", access: Authenticated },
                Route { id: UpdatePet, pattern: "/dashboard/update-pet/:id", access: Authenticated },
                Route { id: CreateCampaign, pattern: "/dashboard/create-donation-campaign", access: Authenticated },
                Route { id: EditCampaign, pattern: "/dashboard/donations-edit/:id", access: Authenticated },
                Route { id: MyCampaigns, pattern: "/dashboard/my-donation-campaigns", access: Authenticated },
                Route { id: MyDonations, pattern: "/dashboard/my-donations", access: Authenticated },
                Route { id: AdoptionRequests, pattern: "/dashboard/adoption-requests", access: Authenticated },
                Route { id: AdminUsers, pattern: "/dashboard/admin/users", access: Admin },
                Route { id: AdminAllPets, pattern: "/dashboard/admin/all-pets", access: Admin },
                Route { id: AdminAllDonations, pattern: "/dashboard/admin/all-donations", access: Admin },
                Route { id: InternalError, pattern: "/error/internal", access: Public },
            ],
        }
    }

    /// Match a path against the table; `:param` segments capture.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let path = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> =
            path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();
        'routes: for route in &self.routes {
            let pattern: Vec<&str> = route
                .pattern
                .trim_matches('/')
                .split('/')
                .filter(|s| !s.is_empty())
                .collect();
            if pattern.len() != segments.len() {
                continue;
            }
            let mut params = HashMap::new();
            for (pat, seg) in pattern.iter().zip(&segments) {
                if let Some(name) = pat.strip_prefix(':') {
                    params.insert(name.to_string(), (*seg).to_string());
                } else if pat != seg {
                    continue 'routes;
                }
            }
            return Some(RouteMatch { id: route.id, access: route.access, params });
        }
        None
    }

    /// Evaluate the guards for a path. `admin` is the role resolver's cached
    /// answer for the current principal (None while unresolved).
    pub fn resolve(
        &self,
        path: &str,
        session: &SessionState,
        admin: Option<bool>,
        nav: &NavState,
    ) -> RouteDecision {
        let Some(matched) = self.match_path(path) else {
            return RouteDecision::NotFound;
        };
        match matched.access {
            Access::Public => RouteDecision::Render(matched),
            Access::Authenticated => match session {
                SessionState::Restoring => RouteDecision::Pending,
                SessionState::SignedOut => {
                    RouteDecision::RedirectToLogin { from: path.to_string() }
                }
                SessionState::SignedIn { .. } => RouteDecision::Render(matched),
            },
            Access::Admin => match session {
                SessionState::Restoring => RouteDecision::Pending,
                SessionState::SignedOut => {
                    RouteDecision::RedirectToLogin { from: path.to_string() }
                }
                SessionState::SignedIn { .. } => match admin {
                    None => RouteDecision::Pending,
                    Some(true) => RouteDecision::Render(matched),
                    Some(false) => RouteDecision::RedirectToDashboard {
                        forbidden_notice: !nav.from_admin_redirect,
                    },
                },
            },
        }
    }
}
